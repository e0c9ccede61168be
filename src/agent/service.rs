//! Chat service: one human message in, one reply out.

use std::sync::Arc;

use thiserror::Error;

use crate::agent_loop::{StopReason, TurnEventSink, TurnRequest, TurnRunner};
use crate::config::ConfidantConfig;
use crate::error::ConfidantError;
use crate::provider;
use crate::tools::{TavilySearchTool, Tool};
use crate::types::Message;

use super::history::{ConversationLocks, HistoryStore};

/// Conversation key used when the caller does not supply one.
pub const DEFAULT_CONVERSATION: &str = "default";

/// Reply shown to users when the model cannot be reached.
pub const DEFAULT_FALLBACK_REPLY: &str = "I'm really sorry, I couldn't process that. :c";

/// Failures surfaced by [`ChatService::handle_chat`].
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The user text was missing or blank; no external call was made.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The model call failed; history was left untouched.
    #[error("upstream failure: {0}")]
    UpstreamFailure(#[source] ConfidantError),
}

/// Loads history, runs a turn, and persists what the turn produced.
pub struct ChatService {
    runner: TurnRunner,
    history: Arc<dyn HistoryStore>,
    locks: ConversationLocks,
    default_conversation: String,
    fallback_reply: String,
}

impl ChatService {
    pub fn new(runner: TurnRunner, history: Arc<dyn HistoryStore>) -> Self {
        Self {
            runner,
            history,
            locks: ConversationLocks::new(),
            default_conversation: DEFAULT_CONVERSATION.to_string(),
            fallback_reply: DEFAULT_FALLBACK_REPLY.to_string(),
        }
    }

    /// Assemble the service described by `config`: OpenAI model, Tavily
    /// search when a key is configured, in-memory history.
    pub fn from_config(config: &ConfidantConfig) -> Result<Self, ConfidantError> {
        let provider = provider::create_provider(config)?;

        let mut tools: Vec<Arc<dyn Tool>> = Vec::new();
        match &config.tavily_api_key {
            Some(key) => tools.push(Arc::new(TavilySearchTool::new(
                key.clone(),
                config.tavily_base_url.clone(),
                config.search_max_results,
                config.tool_timeout(),
            )?)),
            None => tracing::warn!("TAVILY_API_KEY not set, web search disabled"),
        }

        let runner = TurnRunner::new(provider, tools)
            .with_prompt(config.prompt_template())
            .with_settings(config.generation_settings())
            .with_limits(config.turn_limits());

        Ok(Self::new(runner, Arc::new(super::InMemoryHistoryStore::new()))
            .with_default_conversation(config.default_conversation.clone())
            .with_fallback_reply(config.fallback_reply.clone()))
    }

    pub fn with_default_conversation(mut self, key: impl Into<String>) -> Self {
        self.default_conversation = key.into();
        self
    }

    pub fn with_fallback_reply(mut self, reply: impl Into<String>) -> Self {
        self.fallback_reply = reply.into();
        self
    }

    pub fn history(&self) -> &Arc<dyn HistoryStore> {
        &self.history
    }

    pub fn fallback_reply(&self) -> &str {
        &self.fallback_reply
    }

    /// Run one turn and return the final `ai` text.
    pub async fn handle_chat(
        &self,
        conversation: Option<&str>,
        text: &str,
    ) -> Result<String, ServiceError> {
        self.handle_chat_with_events(conversation, text, None).await
    }

    /// Like [`handle_chat`](Self::handle_chat), forwarding turn events to `sink`.
    pub async fn handle_chat_with_events(
        &self,
        conversation: Option<&str>,
        text: &str,
        sink: Option<TurnEventSink>,
    ) -> Result<String, ServiceError> {
        if text.trim().is_empty() {
            return Err(ServiceError::InvalidInput("Message is required.".into()));
        }
        let key = conversation
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or(self.default_conversation.as_str());

        let _guard = self.locks.lock(key).await;

        let human = Message::human(text);
        let mut messages = self.history.get(key).await;
        messages.push(human.clone());

        let mut request = TurnRequest::new(key, messages);
        if let Some(sink) = sink {
            request = request.with_event_sink(sink);
        }

        let outcome = self
            .runner
            .run(request)
            .await
            .map_err(ServiceError::UpstreamFailure)?;

        let mut produced = Vec::with_capacity(outcome.messages.len() + 1);
        produced.push(human);
        produced.extend(outcome.messages);
        self.history.append(key, produced).await;

        tracing::info!(
            conversation = %key,
            turn_id = %outcome.turn_id,
            tool_rounds = outcome.tool_rounds,
            stop_reason = ?outcome.stop_reason,
            finish_reason = ?outcome.finish_reason,
            "chat turn finished"
        );

        if outcome.final_text.is_empty() && outcome.stop_reason == StopReason::RoundLimit {
            return Ok(self.fallback_reply.clone());
        }
        Ok(outcome.final_text)
    }

    /// User-facing reply: model failures become the fallback reply.
    ///
    /// Only [`ServiceError::InvalidInput`] is returned as an error.
    pub async fn reply(&self, conversation: Option<&str>, text: &str) -> Result<String, ServiceError> {
        match self.handle_chat(conversation, text).await {
            Err(ServiceError::UpstreamFailure(err)) => {
                tracing::error!(error = %err, "agent turn failed, sending fallback reply");
                Ok(self.fallback_reply.clone())
            }
            other => other,
        }
    }
}
