//! Turn loop controller.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;

use crate::error::ConfidantError;
use crate::provider::{ModelProvider, ProviderRequest, ProviderResponse, ToolDefinition};
use crate::tools::tool::{Tool, ToolContext};
use crate::tools::validation::validate_arguments;
use crate::tools::ToolArguments;
use crate::types::{GenerationSettings, Message, Role, ToolInvocationRequest, ToolResult, Usage};
use crate::util::timeout::with_timeout;

use super::events::{TurnEventEmitter, TurnEventPayload};
use super::prompt::PromptTemplate;
use super::types::{StopReason, TurnLimits, TurnOutcome, TurnRequest, TurnState};

/// Drives one turn: asks the model, runs requested tools, feeds results
/// back, and stops as soon as the model replies without tool calls.
///
/// Termination depends only on the absence of tool calls; the reply text is
/// never inspected.
pub struct TurnRunner {
    provider: Arc<dyn ModelProvider>,
    tools: Vec<Arc<dyn Tool>>,
    prompt: PromptTemplate,
    settings: GenerationSettings,
    limits: TurnLimits,
}

impl TurnRunner {
    pub fn new(provider: Arc<dyn ModelProvider>, tools: Vec<Arc<dyn Tool>>) -> Self {
        Self {
            provider,
            tools,
            prompt: PromptTemplate::default(),
            settings: GenerationSettings::default(),
            limits: TurnLimits::default(),
        }
    }

    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_limits(mut self, limits: TurnLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Run the loop to completion.
    ///
    /// Tool failures never fail the turn. A model failure aborts it and
    /// returns the error; nothing produced so far is returned.
    pub async fn run(&self, request: TurnRequest) -> Result<TurnOutcome, ConfidantError> {
        let emitter = TurnEventEmitter::new(request.turn_id, request.event_sink.clone());
        let tool_defs = self.tool_definitions();
        let conversation = request.conversation;
        let mut messages = request.messages;
        let input_len = messages.len();

        let mut state = TurnState::AwaitingModel;
        let mut tool_rounds = 0usize;
        let mut usage = Usage::default();
        let mut stop_reason = StopReason::NoToolCalls;
        let mut finish_reason = None;

        tracing::debug!(
            turn_id = %request.turn_id,
            conversation = %conversation,
            provider = self.provider.provider_name(),
            model = self.provider.model_id(),
            history = input_len,
            "turn start"
        );

        while state != TurnState::Done {
            state = match state {
                TurnState::AwaitingModel => {
                    let tools_offered = tool_rounds < self.limits.max_tool_rounds;
                    emitter.emit(TurnEventPayload::ModelCallStarted {
                        round: tool_rounds,
                        tools_offered,
                    });

                    let tools: &[ToolDefinition] = if tools_offered { &tool_defs } else { &[] };
                    let response = match self.call_model(&messages, tools).await {
                        Ok(response) => response,
                        Err(err) => {
                            tracing::error!(
                                turn_id = %request.turn_id,
                                conversation = %conversation,
                                round = tool_rounds,
                                error = %err,
                                "model call failed"
                            );
                            emitter.emit(TurnEventPayload::Failed {
                                error: err.to_string(),
                            });
                            return Err(err);
                        }
                    };
                    usage.merge(&response.usage);
                    finish_reason = response.finish_reason;

                    let mut message = response.into_message();
                    if message.has_pending_tool_calls() && !tools_offered {
                        tracing::warn!(
                            turn_id = %request.turn_id,
                            dropped = message.tool_calls.len(),
                            "tool round limit reached, dropping tool calls"
                        );
                        message.tool_calls.clear();
                        stop_reason = StopReason::RoundLimit;
                    } else if !tools_offered {
                        stop_reason = StopReason::RoundLimit;
                    }

                    let next = if message.has_pending_tool_calls() {
                        TurnState::DispatchingTools
                    } else {
                        TurnState::Done
                    };
                    messages.push(message);
                    next
                }
                TurnState::DispatchingTools => {
                    tool_rounds += 1;
                    let calls = messages
                        .last()
                        .map(|m| m.tool_calls.clone())
                        .unwrap_or_default();

                    let results = join_all(
                        calls
                            .iter()
                            .map(|call| self.dispatch(call, &conversation, &emitter)),
                    )
                    .await;

                    for result in results {
                        emitter.emit(TurnEventPayload::ToolResult {
                            result: result.clone(),
                        });
                        messages.push(Message::tool(result));
                    }
                    TurnState::AwaitingModel
                }
                TurnState::Done => TurnState::Done,
            };
        }

        let produced = messages.split_off(input_len);
        let final_text = final_text(&produced, stop_reason);

        tracing::debug!(
            turn_id = %request.turn_id,
            conversation = %conversation,
            tool_rounds,
            produced = produced.len(),
            total_tokens = usage.total_tokens,
            "turn complete"
        );
        emitter.emit(TurnEventPayload::Completed { stop_reason });

        Ok(TurnOutcome {
            turn_id: request.turn_id,
            final_text,
            messages: produced,
            tool_rounds,
            usage,
            stop_reason,
            finish_reason,
        })
    }

    fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    async fn call_model(
        &self,
        conversation: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<ProviderResponse, ConfidantError> {
        let offered: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        let instructions = self.prompt.render(&offered, Utc::now());
        let mut prompt = Vec::with_capacity(conversation.len() + 1);
        prompt.push(Message::system(instructions));
        prompt.extend(conversation.iter().cloned());

        let request = ProviderRequest {
            messages: prompt,
            settings: self.settings.clone(),
            tools: tools.to_vec(),
        };

        self.limits
            .model_retry
            .execute(|| with_timeout(self.limits.model_timeout, self.provider.generate(&request)))
            .await
    }

    /// Resolve one invocation request to exactly one result.
    async fn dispatch(
        &self,
        call: &ToolInvocationRequest,
        conversation: &str,
        emitter: &TurnEventEmitter,
    ) -> ToolResult {
        emitter.emit(TurnEventPayload::ToolCallStarted { call: call.clone() });

        let Some(tool) = self.tools.iter().find(|t| t.name() == call.name) else {
            tracing::warn!(tool = %call.name, call_id = %call.id, "unknown tool requested");
            return ToolResult::failure(&call.id, format!("Tool '{}' not found", call.name));
        };

        if let Err(err) = validate_arguments(&call.arguments, &tool.parameters().schema) {
            tracing::warn!(tool = %call.name, call_id = %call.id, error = %err, "rejected tool arguments");
            return ToolResult::failure(&call.id, err);
        }

        let args = ToolArguments::new(call.arguments.clone());
        let ctx = ToolContext {
            tool_call_id: call.id.clone(),
            conversation: conversation.to_string(),
        };

        match with_timeout(self.limits.tool_timeout, tool.invoke(&args, &ctx)).await {
            Ok(text) => {
                tracing::debug!(tool = %call.name, call_id = %call.id, bytes = text.len(), "tool call succeeded");
                ToolResult::success(&call.id, text)
            }
            Err(err) => {
                tracing::warn!(tool = %call.name, call_id = %call.id, error = %err, "tool call failed");
                ToolResult::failure(&call.id, err)
            }
        }
    }
}

/// Text of the last `ai` message; after a round-limit stop with an empty
/// reply, the latest non-empty `ai` text of the turn.
fn final_text(produced: &[Message], stop_reason: StopReason) -> String {
    let mut ai = produced.iter().rev().filter(|m| m.role == Role::Ai);
    let last = ai.next().map(|m| m.content.clone()).unwrap_or_default();
    if !last.is_empty() || stop_reason == StopReason::NoToolCalls {
        return last;
    }
    ai.find(|m| !m.content.is_empty())
        .map(|m| m.content.clone())
        .unwrap_or_default()
}
