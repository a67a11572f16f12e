//! Agent system: the tool-calling primary agent and its fallback controller.

pub mod fallback;
pub mod history;
pub mod primary;

pub use fallback::{AgentResponse, FallbackController, Provenance, FALLBACK_PREFIX};
pub use history::ChatHistory;
pub use primary::{AgentOptions, AgentOptionsUpdate, AgentReply, TravelAgent};
