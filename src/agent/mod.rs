//! Conversation history and the chat service entry point.

pub mod history;
pub mod service;

pub use history::{ConversationLocks, HistoryStore, InMemoryHistoryStore};
pub use service::{ChatService, ServiceError, DEFAULT_CONVERSATION, DEFAULT_FALLBACK_REPLY};
