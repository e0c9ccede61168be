//! Shared test helpers: scripted provider and canned tools.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use confidant::agent::{ChatService, InMemoryHistoryStore};
use confidant::agent_loop::{TurnLimits, TurnRunner};
use confidant::error::ConfidantError;
use confidant::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use confidant::tools::{AgentTool, AgentToolParameters, Tool};
use confidant::types::*;
use confidant::util::retry::RetryPolicy;

/// A provider that replays queued responses and records every request.
#[derive(Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<ProviderResponse, ConfidantError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a plain text reply.
    pub fn reply(&self, text: &str) -> &Self {
        self.push(Ok(ProviderResponse {
            text: text.to_string(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
                total_tokens: 15,
            },
            finish_reason: Some(FinishReason::Stop),
            ..Default::default()
        }))
    }

    /// Queue a reply requesting the given tool calls.
    pub fn tool_calls(&self, calls: &[(&str, &str, Value)]) -> &Self {
        self.push(Ok(ProviderResponse {
            tool_calls: calls
                .iter()
                .map(|(id, name, args)| ToolInvocationRequest {
                    id: id.to_string(),
                    name: name.to_string(),
                    arguments: args.clone(),
                })
                .collect(),
            usage: Usage {
                input_tokens: 8,
                output_tokens: 4,
                total_tokens: 12,
            },
            finish_reason: Some(FinishReason::ToolCalls),
            ..Default::default()
        }))
    }

    /// Queue a single search call.
    pub fn search(&self, id: &str, query: &str) -> &Self {
        self.tool_calls(&[(id, SEARCH_TOOL, json!({ "query": query }))])
    }

    /// Queue a failure.
    pub fn fail(&self, err: ConfidantError) -> &Self {
        self.push(Err(err))
    }

    fn push(&self, item: Result<ProviderResponse, ConfidantError>) -> &Self {
        self.script.lock().unwrap().push_back(item);
        self
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_id(&self) -> &str {
        "scripted-model"
    }

    async fn generate(&self, request: &ProviderRequest) -> Result<ProviderResponse, ConfidantError> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ConfidantError::api(500, "script exhausted")))
    }
}

pub const SEARCH_TOOL: &str = "tavily_search_results_json";

/// Search tool stub returning a fixed JSON array.
pub fn fake_search(output: &'static str) -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        SEARCH_TOOL,
        "Search the web",
        AgentToolParameters::object()
            .string("query", "The search query", true)
            .build(),
        move |_args, _ctx| async move { Ok(output.to_string()) },
    ))
}

/// Search tool stub that always fails with a network-style error.
pub fn failing_search(message: &'static str) -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        SEARCH_TOOL,
        "Search the web",
        AgentToolParameters::object()
            .string("query", "The search query", true)
            .build(),
        move |_args, _ctx| async move { Err(ConfidantError::tool(SEARCH_TOOL, message)) },
    ))
}

/// Limits with no retry and short timeouts.
pub fn test_limits(max_tool_rounds: usize) -> TurnLimits {
    TurnLimits {
        max_tool_rounds,
        model_timeout: Duration::from_secs(5),
        tool_timeout: Duration::from_secs(5),
        model_retry: RetryPolicy::none(),
    }
}

pub fn runner(provider: Arc<ScriptedProvider>, tools: Vec<Arc<dyn Tool>>) -> TurnRunner {
    TurnRunner::new(provider, tools).with_limits(test_limits(5))
}

pub fn service(provider: Arc<ScriptedProvider>, tools: Vec<Arc<dyn Tool>>) -> ChatService {
    ChatService::new(runner(provider, tools), Arc::new(InMemoryHistoryStore::new()))
}

/// Roles of a message sequence, for compact assertions.
pub fn roles(messages: &[Message]) -> Vec<Role> {
    messages.iter().map(|m| m.role).collect()
}
