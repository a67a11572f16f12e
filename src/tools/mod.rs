//! Tool system for function calling.

pub mod arguments;
pub mod registry;
pub mod tool;
pub mod travel;
pub mod types;

pub use arguments::ToolArguments;
pub use registry::ToolRegistry;
pub use tool::{AgentTool, Tool};
pub use types::ToolParameters;
