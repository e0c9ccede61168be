//! Confidant binary entry point.

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use confidant::agent::ChatService;
use confidant::agent_loop::{TurnEvent, TurnEventPayload, TurnEventSink};
use confidant::cli::{ChatArgs, Cli, Commands, ServeArgs};
use confidant::config::ConfidantConfig;
use confidant::error::ConfidantError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let result = match cli.command {
        Commands::Serve(args) => handle_serve(args).await,
        Commands::Chat(args) => handle_chat(args).await,
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "confidant exited with an error");
        eprintln!("Error: {e}");
        eprintln!("Hint: {}", e.recovery_suggestion().hint());
        std::process::exit(1);
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_config(path: Option<&Path>) -> Result<ConfidantConfig, ConfidantError> {
    let config = ConfidantConfig::load(path)?;
    config.validate()?;
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

async fn handle_serve(args: ServeArgs) -> Result<(), ConfidantError> {
    let mut config = load_config(args.config.as_deref())?;
    args.apply_to(&mut config);

    let service = Arc::new(ChatService::from_config(&config)?);
    confidant::server::serve(&config, service).await
}

async fn handle_chat(args: ChatArgs) -> Result<(), ConfidantError> {
    let config = load_config(args.config.as_deref())?;
    let service = ChatService::from_config(&config)?;

    let sink: TurnEventSink = Arc::new(|event: TurnEvent| match &event.payload {
        TurnEventPayload::ToolCallStarted { call } => {
            eprintln!("-> {} {}", call.name, call.arguments);
        }
        TurnEventPayload::ToolResult { result } if result.is_error => {
            eprintln!("   {}", truncate(&result.content, 200));
        }
        _ => {}
    });

    let reply = match service
        .handle_chat_with_events(args.conversation.as_deref(), &args.message, Some(sink))
        .await
    {
        Ok(reply) => reply,
        Err(confidant::agent::ServiceError::InvalidInput(msg)) => {
            return Err(ConfidantError::InvalidArgument(msg));
        }
        Err(confidant::agent::ServiceError::UpstreamFailure(err)) => {
            tracing::error!(error = %err, "model call failed");
            service.fallback_reply().to_string()
        }
    };

    println!("{reply}");
    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
