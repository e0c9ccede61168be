//! Model provider trait and implementations.

pub mod http;
pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ConfidantConfig;
use crate::error::ConfidantError;
use crate::types::{FinishReason, GenerationSettings, Message, ToolInvocationRequest, Usage};

/// A request sent to a model provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// Full prompt: rendered system instructions followed by the conversation.
    pub messages: Vec<Message>,
    pub settings: GenerationSettings,
    /// Tools the model may call; empty means no tool calling.
    pub tools: Vec<ToolDefinition>,
}

/// Tool definition sent to the provider API.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Response from a provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderResponse {
    pub text: String,
    pub tool_calls: Vec<ToolInvocationRequest>,
    pub usage: Usage,
    pub finish_reason: Option<FinishReason>,
}

impl ProviderResponse {
    /// Convert into the `ai` message appended to the conversation.
    pub fn into_message(self) -> Message {
        Message::ai_with_tool_calls(self.text, self.tool_calls)
    }
}

/// Opaque language-model boundary: prompt in, one `ai` message out.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &str;

    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Generate the next message (non-streaming).
    async fn generate(&self, request: &ProviderRequest) -> Result<ProviderResponse, ConfidantError>;
}

/// Create the configured model provider.
pub fn create_provider(config: &ConfidantConfig) -> Result<Arc<dyn ModelProvider>, ConfidantError> {
    let api_key = config
        .openai_api_key
        .clone()
        .ok_or_else(|| ConfidantError::Configuration("Missing OPENAI_API_KEY".into()))?;
    let provider = openai::OpenAiProvider::new(
        config.model.clone(),
        api_key,
        config.openai_base_url.clone(),
        config.model_timeout(),
    )?;
    Ok(Arc::new(provider))
}
