//! Web search through the Tavily search API.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::arguments::ToolArguments;
use super::tool::{Tool, ToolContext};
use super::types::AgentToolParameters;
use crate::error::ConfidantError;
use crate::provider::http::{build_client, status_to_error};

pub const DEFAULT_BASE_URL: &str = "https://api.tavily.com";
pub const TOOL_NAME: &str = "tavily_search_results_json";

/// Searches the web and returns the hits as a JSON array string.
pub struct TavilySearchTool {
    api_key: String,
    base_url: String,
    max_results: u32,
    client: reqwest::Client,
    parameters: AgentToolParameters,
}

impl TavilySearchTool {
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        max_results: u32,
        timeout: Duration,
    ) -> Result<Self, ConfidantError> {
        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            max_results,
            client: build_client(timeout)?,
            parameters: AgentToolParameters::object()
                .string("query", "The search query", true)
                .build(),
        })
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: u32,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

/// One search hit as presented to the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[async_trait]
impl Tool for TavilySearchTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn description(&self) -> &str {
        "A search engine optimized for comprehensive, accurate, and trusted results. \
         Useful for when you need to answer questions about current events. \
         Input should be a search query."
    }

    fn parameters(&self) -> &AgentToolParameters {
        &self.parameters
    }

    async fn invoke(
        &self,
        args: &ToolArguments,
        ctx: &ToolContext,
    ) -> Result<String, ConfidantError> {
        let query = args.get_str("query")?.trim();
        if query.is_empty() {
            return Err(ConfidantError::InvalidArgument("query must not be empty".into()));
        }

        debug!(call_id = %ctx.tool_call_id, query, "Tavily search");

        let resp = self
            .client
            .post(format!("{}/search", self.base_url))
            .json(&SearchRequest {
                api_key: &self.api_key,
                query,
                max_results: self.max_results,
            })
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body));
        }

        let data: SearchResponse = resp.json().await?;
        Ok(serde_json::to_string(&data.results)?)
    }
}
