//! Tests for the tool system.

use confidant::error::ConfidantError;
use confidant::tools::*;

#[test]
fn parameter_builder_constructs_schema() {
    let params = AgentToolParameters::object()
        .string("query", "Search query", true)
        .string("region", "Optional region hint", false)
        .build();

    let schema = &params.schema;
    assert_eq!(schema["type"], "object");
    assert_eq!(schema["properties"]["query"]["type"], "string");
    assert_eq!(schema["properties"]["region"]["description"], "Optional region hint");
    assert_eq!(schema["required"], serde_json::json!(["query"]));
}

#[test]
fn tool_arguments_get_str() {
    let args = ToolArguments::new(serde_json::json!({"name": "Alice", "age": 30}));
    assert_eq!(args.get_str("name").unwrap(), "Alice");
    assert!(matches!(
        args.get_str("missing"),
        Err(ConfidantError::InvalidArgument(_))
    ));
    assert!(args.get_str("age").is_err());
}

#[tokio::test]
async fn agent_tool_invokes_closure() {
    let tool = AgentTool::new(
        "echo",
        "Echo the query back",
        AgentToolParameters::object()
            .string("query", "Text", true)
            .build(),
        |args, ctx| async move {
            Ok(format!("{}:{}", ctx.conversation, args.get_str("query")?))
        },
    );

    let ctx = ToolContext {
        tool_call_id: "call_1".into(),
        conversation: "t1".into(),
    };
    let out = tool
        .invoke(&ToolArguments::new(serde_json::json!({"query": "hi"})), &ctx)
        .await
        .unwrap();

    assert_eq!(tool.name(), "echo");
    assert_eq!(out, "t1:hi");
}
