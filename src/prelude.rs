//! Convenience re-exports for common use.

pub use crate::agent::{ChatService, HistoryStore, InMemoryHistoryStore, ServiceError};
pub use crate::agent_loop::{PromptTemplate, StopReason, TurnLimits, TurnOutcome, TurnRequest, TurnRunner};
pub use crate::config::ConfidantConfig;
pub use crate::error::{ConfidantError, Result};
pub use crate::provider::ModelProvider;
pub use crate::tools::{AgentTool, AgentToolParameters, Tool, ToolArguments, ToolContext};
pub use crate::types::{GenerationSettings, Message, Role, ToolInvocationRequest, ToolResult, Usage};
