//! HTTP surface: liveness probe and the chat endpoint.

mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::agent::ChatService;
use crate::config::ConfidantConfig;
use crate::error::ConfidantError;

pub use handlers::{ChatRequest, ChatResponse, ErrorResponse, LIVENESS_TEXT};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ChatService>,
}

/// Build the application router.
pub fn router(service: Arc<ChatService>) -> Router {
    Router::new()
        .route("/", get(handlers::liveness))
        .route("/chat", post(handlers::chat))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { service })
}

/// Bind `config.bind_host:config.port` and serve until Ctrl-C.
pub async fn serve(config: &ConfidantConfig, service: Arc<ChatService>) -> Result<(), ConfidantError> {
    let addr: SocketAddr = format!("{}:{}", config.bind_host, config.port)
        .parse()
        .map_err(|e| ConfidantError::Configuration(format!("invalid bind address: {e}")))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, model = %config.model, "confidant listening");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
