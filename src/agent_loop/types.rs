//! Core types for one conversational turn.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{FinishReason, Message, Usage};
use crate::util::retry::RetryPolicy;

use super::events::TurnEventSink;

/// Unique turn identifier.
pub type TurnId = Uuid;

/// Turn loop state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    AwaitingModel,
    DispatchingTools,
    Done,
}

/// Why a turn reached `Done`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The model answered without requesting tools.
    NoToolCalls,
    /// The tool-round ceiling was reached and the model was asked to answer without tools.
    RoundLimit,
}

/// Hardening limits applied to every turn.
#[derive(Debug, Clone)]
pub struct TurnLimits {
    /// Maximum tool-dispatch rounds before tools are withheld.
    pub max_tool_rounds: usize,
    pub model_timeout: Duration,
    pub tool_timeout: Duration,
    pub model_retry: RetryPolicy,
}

impl Default for TurnLimits {
    fn default() -> Self {
        Self {
            max_tool_rounds: 5,
            model_timeout: Duration::from_secs(60),
            tool_timeout: Duration::from_secs(30),
            model_retry: RetryPolicy::default(),
        }
    }
}

/// Input to one turn.
#[derive(Clone)]
pub struct TurnRequest {
    pub turn_id: TurnId,
    /// Conversation key, used for logging and tool context.
    pub conversation: String,
    /// Prior history followed by the new human message.
    pub messages: Vec<Message>,
    pub event_sink: Option<TurnEventSink>,
}

impl TurnRequest {
    pub fn new(conversation: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            turn_id: Uuid::new_v4(),
            conversation: conversation.into(),
            messages,
            event_sink: None,
        }
    }

    pub fn with_event_sink(mut self, sink: TurnEventSink) -> Self {
        self.event_sink = Some(sink);
        self
    }
}

/// Result of a completed turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub turn_id: TurnId,
    /// Text of the terminal `ai` message (best available text on `RoundLimit`).
    pub final_text: String,
    /// Messages produced during the turn, in causal order, excluding the input.
    pub messages: Vec<Message>,
    /// Number of tool-dispatch rounds executed.
    pub tool_rounds: usize,
    pub usage: Usage,
    pub stop_reason: StopReason,
    /// Provider-reported finish reason of the last model call.
    pub finish_reason: Option<FinishReason>,
}
