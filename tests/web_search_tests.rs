use std::time::Duration;

use confidant::error::ConfidantError;
use confidant::tools::{TavilySearchTool, Tool, ToolArguments, ToolContext};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn tool(server: &MockServer) -> TavilySearchTool {
    TavilySearchTool::new("tvly-test", Some(server.uri()), 5, Duration::from_secs(5))
        .expect("tool")
}

fn ctx() -> ToolContext {
    ToolContext {
        tool_call_id: "call_1".into(),
        conversation: "t1".into(),
    }
}

#[tokio::test]
async fn search_returns_hits_as_json_array() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(json!({
            "api_key": "tvly-test",
            "query": "mindfulness apps",
            "max_results": 5,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": "mindfulness apps",
            "results": [
                { "title": "Headspace", "url": "https://example.com/a", "content": "Guided meditation", "score": 0.91 },
                { "title": "Calm", "url": "https://example.com/b", "content": "Sleep stories" },
            ],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = tool(&server)
        .invoke(&ToolArguments::new(json!({ "query": "mindfulness apps" })), &ctx())
        .await
        .expect("search should succeed");

    let hits: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(hits.as_array().unwrap().len(), 2);
    assert_eq!(hits[0]["title"], "Headspace");
    assert_eq!(hits[0]["score"], 0.91);
    assert!(hits[1].get("score").is_none());
}

#[tokio::test]
async fn no_results_is_empty_array() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .mount(&server)
        .await;

    let output = tool(&server)
        .invoke(&ToolArguments::new(json!({ "query": "zzzz" })), &ctx())
        .await
        .unwrap();

    assert_eq!(output, "[]");
}

#[tokio::test]
async fn http_failure_is_reported_as_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("search backend down"))
        .mount(&server)
        .await;

    let err = tool(&server)
        .invoke(&ToolArguments::new(json!({ "query": "help" })), &ctx())
        .await
        .unwrap_err();

    assert!(matches!(err, ConfidantError::Api { status: 500, .. }));
}

#[tokio::test]
async fn blank_query_is_rejected_without_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = tool(&server)
        .invoke(&ToolArguments::new(json!({ "query": "  " })), &ctx())
        .await
        .unwrap_err();

    assert!(matches!(err, ConfidantError::InvalidArgument(_)));
}

#[test]
fn schema_requires_query() {
    let tool = TavilySearchTool::new("k", None, 5, Duration::from_secs(1)).unwrap();

    assert_eq!(tool.name(), "tavily_search_results_json");
    assert_eq!(tool.parameters().schema["required"], json!(["query"]));
}
