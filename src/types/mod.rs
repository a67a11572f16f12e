//! Core types for wayfare.

pub mod generation;
pub mod message;
pub mod usage;

pub use generation::{FinishReason, GenerationSettings};
pub use message::{AgentToolCall, AgentToolResult, ContentPart, ModelMessage, Role};
pub use usage::Usage;
