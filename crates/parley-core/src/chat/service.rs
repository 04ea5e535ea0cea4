//! Chat service: the conversation state machine.
//!
//! ChatService coordinates the ChatStore, TokenCounter and LLM provider to
//! run a chat turn: record the user message, replay a bounded context
//! window to the model, record the reply, and account for tokens.
//!
//! The user message is appended before the provider is called and is kept
//! even when the call fails. Nothing is rolled back.

use parley_types::chat::{
    ChatExport, ChatHistory, ChatImport, ChatMessage, ChatReply, MessageDeletion, SendMessage,
    TokenUsage, total_tokens,
};
use parley_types::error::ChatError;
use parley_types::llm::{GenerationRequest, SamplingParams};
use tracing::{debug, info, warn};

use crate::chat::context::{CONTEXT_WINDOW_SIZE, ContextWindow};
use crate::chat::store::ChatStore;
use crate::llm::box_provider::BoxLlmProvider;
use crate::models::DEFAULT_MODEL;
use crate::tokenizer::TokenCounter;

/// Orchestrates chat turns and history maintenance.
///
/// Generic over `ChatStore` and `TokenCounter` to maintain clean
/// architecture (parley-core never depends on parley-infra).
pub struct ChatService<S: ChatStore, T: TokenCounter> {
    store: S,
    counter: T,
    provider: BoxLlmProvider,
    default_model: String,
    sampling: SamplingParams,
}

impl<S: ChatStore, T: TokenCounter> ChatService<S, T> {
    pub fn new(store: S, counter: T, provider: BoxLlmProvider) -> Self {
        Self {
            store,
            counter,
            provider,
            default_model: DEFAULT_MODEL.to_string(),
            sampling: SamplingParams::default(),
        }
    }

    /// Override the model used when a request does not name one.
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // --- Chat turn ---

    /// Run one chat turn and return the assistant reply with token usage.
    pub async fn send_message(&self, request: SendMessage) -> Result<ChatReply, ChatError> {
        let SendMessage {
            chat_id,
            message,
            model,
        } = request;

        if chat_id.is_empty() || message.is_empty() {
            return Err(ChatError::Validation(
                "Chat ID and message are required".to_string(),
            ));
        }

        let model = model
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.default_model.clone());

        let message_tokens = self.counter.count_tokens(&message);
        let history = self
            .store
            .append(&chat_id, ChatMessage::user(message.clone(), message_tokens))
            .await?;

        let window = ContextWindow::latest(&history, CONTEXT_WINDOW_SIZE);
        let context_tokens = self.counter.count_tokens(&window.render());
        let prompt = window.prompt(&message);
        let prompt_tokens = self.counter.count_tokens(&prompt);
        let context_messages = window.len();

        debug!(
            chat_id = %chat_id,
            model = %model,
            context_messages,
            prompt_tokens,
            "Sending prompt to provider"
        );

        let request = GenerationRequest {
            model: model.clone(),
            prompt,
            sampling: self.sampling,
        };
        let completion = match self.provider.generate(&request).await {
            Ok(completion) => completion,
            Err(e) => {
                warn!(chat_id = %chat_id, model = %model, error = %e, "Provider request failed");
                return Err(e.into());
            }
        };

        if completion.text.is_empty() {
            warn!(chat_id = %chat_id, model = %model, "Provider returned no text");
            return Err(ChatError::InvalidResponse);
        }

        let response_tokens = self.counter.count_tokens(&completion.text);
        let history = self
            .store
            .append(
                &chat_id,
                ChatMessage::assistant(completion.text.clone(), response_tokens),
            )
            .await
            .map_err(|e| ChatError::Internal(format!("Error processing response: {e}")))?;

        let total = total_tokens(&history);
        info!(
            chat_id = %chat_id,
            model = %model,
            message_tokens,
            response_tokens,
            total,
            "Chat turn completed"
        );

        Ok(ChatReply {
            response: completion.text,
            chat_id,
            model,
            tokens: TokenUsage {
                message: message_tokens,
                response: response_tokens,
                context: context_tokens,
                total,
                prompt: prompt_tokens,
            },
            context_messages,
        })
    }

    // --- History maintenance ---

    /// Delete the message at `index`, plus the message that follows it.
    pub async fn delete_message(
        &self,
        chat_id: &str,
        index: usize,
    ) -> Result<MessageDeletion, ChatError> {
        let outcome = self
            .store
            .update(chat_id, |messages| remove_with_follower(messages, index))
            .await?;

        let deletion = outcome.ok_or(ChatError::NotFound)??;
        info!(
            chat_id = %chat_id,
            index,
            pair_removed = deletion.pair_removed,
            remaining = deletion.remaining_messages,
            "Message deleted"
        );
        Ok(deletion)
    }

    /// Reset a chat to empty, creating it if unseen.
    pub async fn clear_chat(&self, chat_id: &str) -> Result<(), ChatError> {
        self.store.clear(chat_id).await?;
        info!(chat_id = %chat_id, "Chat cleared");
        Ok(())
    }

    /// Full history of a chat. Unseen chats are created empty.
    pub async fn history(&self, chat_id: &str) -> Result<ChatHistory, ChatError> {
        let history = self.store.get_or_create(chat_id).await?;
        let tokens = total_tokens(&history);
        Ok(ChatHistory { history, tokens })
    }

    /// Export a chat. Unlike [`Self::history`], unseen chats are an error.
    pub async fn export_chat(&self, chat_id: &str) -> Result<ChatExport, ChatError> {
        let messages = self.store.get(chat_id).await?.ok_or(ChatError::NotFound)?;
        let tokens = total_tokens(&messages);
        Ok(ChatExport {
            id: chat_id.to_string(),
            messages,
            tokens,
        })
    }

    /// Replace a chat's history with imported messages, as given.
    ///
    /// Token counts are taken from the records and never recomputed.
    pub async fn import_chat(&self, import: ChatImport) -> Result<String, ChatError> {
        let (Some(id), Some(messages)) = (import.id, import.messages) else {
            return Err(ChatError::Validation("Invalid chat data".to_string()));
        };

        let count = messages.len();
        self.store.replace(&id, messages).await?;
        info!(chat_id = %id, messages = count, "Chat imported");
        Ok(id)
    }
}

/// Remove `messages[index]` and, if one now sits at `index`, its follower.
///
/// Removal is positional: the follower goes regardless of its role.
fn remove_with_follower(
    messages: &mut Vec<ChatMessage>,
    index: usize,
) -> Result<MessageDeletion, ChatError> {
    let len = messages.len();
    if index >= len {
        return Err(ChatError::IndexOutOfRange { index, len });
    }

    messages.remove(index);
    let pair_removed = index < messages.len();
    if pair_removed {
        messages.remove(index);
    }

    Ok(MessageDeletion {
        total_tokens: total_tokens(messages),
        remaining_messages: messages.len(),
        pair_removed,
    })
}
