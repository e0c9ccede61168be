//! Conversation history store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::types::Message;

/// Keyed, append-only conversation storage.
///
/// Neither operation can fail. Implementations may be swapped for a durable
/// backend; the in-memory one lives for the process lifetime.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Stored messages for `key`, or an empty sequence if none.
    async fn get(&self, key: &str) -> Vec<Message>;

    /// Concatenate `messages` onto the sequence for `key`, creating it if absent.
    async fn append(&self, key: &str, messages: Vec<Message>);
}

/// Process-wide in-memory history with no eviction.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    conversations: RwLock<HashMap<String, Vec<Message>>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Conversation keys with at least one stored message.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.conversations.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn get(&self, key: &str) -> Vec<Message> {
        self.conversations
            .read()
            .await
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    async fn append(&self, key: &str, messages: Vec<Message>) {
        if messages.is_empty() {
            return;
        }
        self.conversations
            .write()
            .await
            .entry(key.to_string())
            .or_default()
            .extend(messages);
    }
}

/// One async mutex per conversation key.
///
/// Holding the guard across read, turn, and write keeps concurrent turns
/// on the same key from interleaving; different keys never contend.
#[derive(Debug, Default)]
pub struct ConversationLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ConversationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.entry(key.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn unseen_key_is_empty() {
        let store = InMemoryHistoryStore::new();
        assert!(store.get("never-seen").await.is_empty());
        assert!(store.keys().await.is_empty());
    }

    #[tokio::test]
    async fn empty_append_does_not_create_entry() {
        let store = InMemoryHistoryStore::new();
        store.append("k", Vec::new()).await;
        assert!(store.keys().await.is_empty());
    }

    #[tokio::test]
    async fn same_key_lock_is_exclusive() {
        let locks = Arc::new(ConversationLocks::new());
        let guard = locks.lock("t1").await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.lock("t1").await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        let _other = tokio::time::timeout(Duration::from_millis(100), locks.lock("t2"))
            .await
            .expect("different key must not block");

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .expect("contender should acquire after release")
            .unwrap();
    }
}
