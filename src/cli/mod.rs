//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ConfidantConfig;

/// Confidant support-chat agent
#[derive(Parser, Debug)]
#[command(name = "confidant", version, about = "Supportive chat agent with web search")]
pub struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Send one message and print the reply
    Chat(ChatArgs),
}

/// Arguments for `confidant serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Config file path
    #[arg(short, long, env = "CONFIDANT_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Arguments for `confidant chat`.
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Conversation key (defaults to the configured default conversation)
    #[arg(long)]
    pub conversation: Option<String>,

    /// Config file path
    #[arg(short, long, env = "CONFIDANT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Message to send
    pub message: String,
}

impl ServeArgs {
    /// Flags win over every other config layer.
    pub fn apply_to(&self, config: &mut ConfidantConfig) {
        if let Some(host) = &self.host {
            config.bind_host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
    }
}
