//! System instruction template rendered before every model call.

use chrono::{DateTime, SecondsFormat, Utc};

/// Default instruction template. Placeholders: `{tool_names}`,
/// `{system_message}`, `{time}`.
pub const DEFAULT_TEMPLATE: &str = "You are a supportive friend who helps people feel better and reflect. \
Use the available tools when they would genuinely help.
Answer directly once you can fully respond, and never repeat the same task over and over.
Available tools: {tool_names}.
{system_message}
Current time: {time}";

/// Default persona text substituted for `{system_message}`.
pub const DEFAULT_SYSTEM_MESSAGE: &str = "Act as an emotional-support friend or casual \
therapist. Sound warm, grounded, and approachable: neither gushing nor clinical. Keep replies \
casual and at most eight sentences.

If the user wants to practice a scenario, invent one where you are the one having a rough day \
(as a friend, co-worker, stranger, or family member) and let the user comfort you; the length \
limit does not apply there. Once they respond, tell them honestly how their words landed and \
what they could try next time.

Stay human and a little vulnerable, the way a real friend would.";

/// Injectable instruction template.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    template: String,
    system_message: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE, DEFAULT_SYSTEM_MESSAGE)
    }
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>, system_message: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            system_message: system_message.into(),
        }
    }

    /// Render the instructions for one model call.
    pub fn render(&self, tool_names: &[&str], now: DateTime<Utc>) -> String {
        let tools = if tool_names.is_empty() {
            "none".to_string()
        } else {
            tool_names.join(", ")
        };
        self.template
            .replace("{tool_names}", &tools)
            .replace("{system_message}", &self.system_message)
            .replace("{time}", &now.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}
