//! ChatStore trait definition.
//!
//! A keyed store of ordered message lists. The in-process implementation
//! lives in parley-infra (`InMemoryChatStore`); an external keyed store can
//! be dropped in behind the same contract.

use parley_types::chat::ChatMessage;
use parley_types::error::StoreError;

/// Repository trait for chat histories.
///
/// Lookups through `get_or_create`, `append`, `replace` and `clear` create
/// the chat lazily. `get` and `update` never create.
pub trait ChatStore: Send + Sync {
    /// Get a chat's messages, or `None` if the chat was never referenced.
    fn get(
        &self,
        chat_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Vec<ChatMessage>>, StoreError>> + Send;

    /// Get a chat's messages, creating an empty chat if unseen.
    fn get_or_create(
        &self,
        chat_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, StoreError>> + Send;

    /// Append a message and return the chat's messages after the append.
    fn append(
        &self,
        chat_id: &str,
        message: ChatMessage,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, StoreError>> + Send;

    /// Apply `f` to an existing chat's messages in place.
    ///
    /// Returns `None` without calling `f` when the chat does not exist.
    fn update<R, F>(
        &self,
        chat_id: &str,
        f: F,
    ) -> impl std::future::Future<Output = Result<Option<R>, StoreError>> + Send
    where
        F: FnOnce(&mut Vec<ChatMessage>) -> R + Send,
        R: Send;

    /// Overwrite a chat's messages.
    fn replace(
        &self,
        chat_id: &str,
        messages: Vec<ChatMessage>,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Reset a chat to an empty list. The key is kept (or created).
    fn clear(
        &self,
        chat_id: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
