//! Typed access to tool call arguments.

use crate::error::ConfidantError;

/// Arguments of one tool call, already checked against the tool's schema.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    pub fn new(value: serde_json::Value) -> Self {
        Self { value }
    }

    /// Required string argument.
    pub fn get_str(&self, key: &str) -> Result<&str, ConfidantError> {
        self.value.get(key).and_then(|v| v.as_str()).ok_or_else(|| {
            ConfidantError::InvalidArgument(format!("Missing string argument: {key}"))
        })
    }
}
