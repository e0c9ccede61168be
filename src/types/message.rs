//! Message types for model communication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A role-tagged unit of conversation content.
///
/// An `ai` message may carry pending tool-invocation requests; a `tool`
/// message answers exactly one of them and names it in `tool_call_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolInvocationRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Message {
    fn new(role: Role, content: String) -> Self {
        Self {
            role,
            content,
            tool_calls: Vec::new(),
            tool_call_id: None,
            timestamp: Some(Utc::now()),
        }
    }

    /// Create a system message.
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text.into())
    }

    /// Create a human (user) message.
    pub fn human(text: impl Into<String>) -> Self {
        Self::new(Role::Human, text.into())
    }

    /// Create an ai message with no pending tool calls.
    pub fn ai(text: impl Into<String>) -> Self {
        Self::new(Role::Ai, text.into())
    }

    /// Create an ai message carrying pending tool-invocation requests.
    pub fn ai_with_tool_calls(
        text: impl Into<String>,
        tool_calls: Vec<ToolInvocationRequest>,
    ) -> Self {
        Self {
            tool_calls,
            ..Self::new(Role::Ai, text.into())
        }
    }

    /// Create a tool message answering one invocation request.
    pub fn tool(result: ToolResult) -> Self {
        Self {
            tool_call_id: Some(result.tool_call_id),
            ..Self::new(Role::Tool, result.content)
        }
    }

    /// Whether this is an ai message waiting on tool results.
    pub fn has_pending_tool_calls(&self) -> bool {
        self.role == Role::Ai && !self.tool_calls.is_empty()
    }
}

/// Conversation role.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    Human,
    Ai,
    Tool,
}

/// A model-issued request to call a tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolInvocationRequest {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// Text output of a tool call, correlated to its request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    pub tool_call_id: String,
    pub content: String,
    #[serde(default)]
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
            is_error: false,
        }
    }

    /// A result describing a failed call; the text is what the model sees.
    pub fn failure(tool_call_id: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            content: format!("Error: {error}"),
            is_error: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn roles_serialize_lowercase() {
        let msg = Message::human("hi");
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["role"], "human");
        assert_eq!(Role::Ai.to_string(), "ai");
        assert!(value.get("tool_calls").is_none());
    }

    #[test]
    fn tool_message_carries_correlation_id() {
        let msg = Message::tool(ToolResult::success("call_1", "sunny"));

        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(msg.content, "sunny");
    }

    #[test]
    fn pending_tool_calls_only_on_ai_messages() {
        let call = ToolInvocationRequest {
            id: "call_1".into(),
            name: "search".into(),
            arguments: json!({"query": "rust"}),
        };
        let ai = Message::ai_with_tool_calls("", vec![call]);

        assert!(ai.has_pending_tool_calls());
        assert!(!Message::ai("done").has_pending_tool_calls());
    }

    #[test]
    fn failure_result_describes_error() {
        let result = ToolResult::failure("call_9", "network down");

        assert!(result.is_error);
        assert_eq!(result.content, "Error: network down");
    }
}
