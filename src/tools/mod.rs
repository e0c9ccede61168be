//! Tool system for function calling.

pub mod arguments;
pub mod tool;
pub mod types;
pub mod validation;
pub mod web_search;

pub use arguments::ToolArguments;
pub use tool::{AgentTool, Tool, ToolContext};
pub use types::AgentToolParameters;
pub use web_search::TavilySearchTool;
