//! Confidant: a supportive chat agent that can search the web.
//!
//! A [`ChatService`](agent::ChatService) takes one human message, runs a
//! tool-calling turn against the model, and stores the produced messages
//! under the conversation key.
//!
//! ```no_run
//! use confidant::prelude::*;
//!
//! # async fn example() -> confidant::error::Result<()> {
//! let config = ConfidantConfig::load(None)?;
//! let service = ChatService::from_config(&config)?;
//! let reply = service.reply(Some("t1"), "I had a rough day").await;
//! # let _ = reply;
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod agent_loop;
pub mod cli;
pub mod config;
pub mod error;
pub mod prelude;
pub mod provider;
pub mod server;
pub mod tools;
pub mod types;
pub mod util;
