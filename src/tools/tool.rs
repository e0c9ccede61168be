//! Tool contract and the closure-backed implementation.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use super::arguments::ToolArguments;
use super::types::AgentToolParameters;
use crate::error::ConfidantError;
use crate::provider::ToolDefinition;

/// Per-invocation context handed to a tool.
#[derive(Debug, Clone, Default)]
pub struct ToolContext {
    /// Id of the invocation request being answered.
    pub tool_call_id: String,
    /// Conversation the turn belongs to.
    pub conversation: String,
}

/// A single external capability the model may call.
///
/// Implementations are stateless between invocations. Failures are returned
/// as errors; the turn loop turns them into failed `tool` messages.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model uses to call this tool.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Input schema offered to the model and checked before `invoke`.
    fn parameters(&self) -> &AgentToolParameters;

    /// Run the tool and return its text result.
    async fn invoke(&self, args: &ToolArguments, ctx: &ToolContext)
        -> Result<String, ConfidantError>;

    /// Definition sent to the model provider.
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters().schema.clone(),
        }
    }
}

type Handler =
    dyn Fn(ToolArguments, ToolContext) -> BoxFuture<'static, Result<String, ConfidantError>> + Send + Sync;

/// Tool backed by an async closure, mostly for tests and small built-ins.
#[derive(Clone)]
pub struct AgentTool {
    name: String,
    description: String,
    parameters: AgentToolParameters,
    handler: Arc<Handler>,
}

impl AgentTool {
    pub fn new<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: AgentToolParameters,
        handler: F,
    ) -> Self
    where
        F: Fn(ToolArguments, ToolContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, ConfidantError>> + Send + 'static,
    {
        let handler: Arc<Handler> = Arc::new(
            move |args: ToolArguments, ctx: ToolContext| -> BoxFuture<'static, Result<String, ConfidantError>> {
                Box::pin(handler(args, ctx))
            },
        );
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            handler,
        }
    }
}

#[async_trait]
impl Tool for AgentTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &AgentToolParameters {
        &self.parameters
    }

    async fn invoke(
        &self,
        args: &ToolArguments,
        ctx: &ToolContext,
    ) -> Result<String, ConfidantError> {
        (self.handler)(args.clone(), ctx.clone()).await
    }
}

impl std::fmt::Debug for AgentTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentTool")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn definition_mirrors_name_and_schema() {
        let tool = AgentTool::new(
            "lookup",
            "Look something up",
            AgentToolParameters::object()
                .string("query", "What to look up", true)
                .build(),
            |_args, _ctx| async { Ok(String::new()) },
        );

        let def = tool.definition();

        assert_eq!(def.name, "lookup");
        assert_eq!(def.description, "Look something up");
        assert_eq!(def.parameters["required"], json!(["query"]));
    }
}
