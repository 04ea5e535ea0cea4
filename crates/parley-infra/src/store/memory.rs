//! Process-local chat store backed by `DashMap`.
//!
//! Histories live for the lifetime of the process; nothing is persisted or
//! evicted. Each operation holds a single shard lock for its duration and
//! returns cloned data, so no `DashMap` guard outlives the call or crosses
//! an `.await`.

use std::sync::Arc;

use dashmap::DashMap;

use parley_core::chat::store::ChatStore;
use parley_types::chat::ChatMessage;
use parley_types::error::StoreError;

/// Concurrent in-memory map from chat id to message list.
///
/// Cloning produces a shared view of the same underlying data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChatStore {
    chats: Arc<DashMap<String, Vec<ChatMessage>>>,
}

impl InMemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chats currently known.
    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }
}

impl ChatStore for InMemoryChatStore {
    async fn get(&self, chat_id: &str) -> Result<Option<Vec<ChatMessage>>, StoreError> {
        Ok(self.chats.get(chat_id).map(|r| r.value().clone()))
    }

    async fn get_or_create(&self, chat_id: &str) -> Result<Vec<ChatMessage>, StoreError> {
        let entry = self.chats.entry(chat_id.to_string()).or_default();
        Ok(entry.value().clone())
    }

    async fn append(
        &self,
        chat_id: &str,
        message: ChatMessage,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        let mut entry = self.chats.entry(chat_id.to_string()).or_default();
        entry.push(message);
        Ok(entry.value().clone())
    }

    async fn update<R, F>(&self, chat_id: &str, f: F) -> Result<Option<R>, StoreError>
    where
        F: FnOnce(&mut Vec<ChatMessage>) -> R + Send,
        R: Send,
    {
        Ok(self
            .chats
            .get_mut(chat_id)
            .map(|mut entry| f(entry.value_mut())))
    }

    async fn replace(&self, chat_id: &str, messages: Vec<ChatMessage>) -> Result<(), StoreError> {
        self.chats.insert(chat_id.to_string(), messages);
        Ok(())
    }

    async fn clear(&self, chat_id: &str) -> Result<(), StoreError> {
        self.chats.insert(chat_id.to_string(), Vec::new());
        Ok(())
    }
}
