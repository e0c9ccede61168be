use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::AppState;
use crate::agent::ServiceError;

pub const LIVENESS_TEXT: &str = "confidant is running";

const MESSAGE_REQUIRED: &str = "Message is required.";
const CONVERSATION_ID_INVALID: &str = "conversation_id must be a string.";

type ApiResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

/// Body of `POST /chat`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Anything other than a non-blank string is rejected.
    #[serde(default)]
    pub message: Option<Value>,
    /// Optional; must be a string when present and non-null.
    #[serde(default)]
    pub conversation_id: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn bad_request(msg: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse { error: msg.into() }),
    )
}

pub(super) async fn liveness() -> &'static str {
    LIVENESS_TEXT
}

/// Bodies are parsed by hand so malformed or missing JSON gets the same
/// 400 as a missing `message`.
pub(super) async fn chat(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<ChatResponse>> {
    let req: ChatRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "unparseable chat body");
        bad_request(MESSAGE_REQUIRED)
    })?;

    let message = match &req.message {
        Some(Value::String(text)) if !text.trim().is_empty() => text.as_str(),
        _ => return Err(bad_request(MESSAGE_REQUIRED)),
    };

    let conversation = match &req.conversation_id {
        None | Some(Value::Null) => None,
        Some(Value::String(key)) => Some(key.as_str()),
        Some(_) => return Err(bad_request(CONVERSATION_ID_INVALID)),
    };

    match state
        .service
        .handle_chat(conversation, message)
        .await
    {
        Ok(response) => Ok(Json(ChatResponse { response })),
        Err(ServiceError::InvalidInput(_)) => Err(bad_request(MESSAGE_REQUIRED)),
        Err(ServiceError::UpstreamFailure(err)) => {
            tracing::error!(error = %err, "chat turn failed");
            Ok(Json(ChatResponse {
                response: state.service.fallback_reply().to_string(),
            }))
        }
    }
}
