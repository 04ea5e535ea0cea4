//! Chat message and history types for Parley.
//!
//! A chat is an ordered list of [`ChatMessage`] records keyed by an opaque,
//! client-supplied chat id. Each record carries the token count computed when
//! it was appended (or whatever count it was imported with).

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    /// Speaker label used when rendering a transcript for the model.
    pub fn speaker(&self) -> &'static str {
        match self {
            MessageRole::User => "User",
            MessageRole::Assistant => "Assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single message within a chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    /// Token count of `content`. Imported records without a count load as 0.
    #[serde(default)]
    pub tokens: u64,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>, tokens: u64) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            tokens,
        }
    }

    pub fn assistant(content: impl Into<String>, tokens: u64) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            tokens,
        }
    }
}

/// Sum of the stored per-message token counts.
pub fn total_tokens(messages: &[ChatMessage]) -> u64 {
    messages.iter().map(|m| m.tokens).sum()
}

/// Input for a single chat turn.
#[derive(Debug, Clone)]
pub struct SendMessage {
    pub chat_id: String,
    pub message: String,
    /// Model override; the service default is used when `None`.
    pub model: Option<String>,
}

/// Token accounting returned with every assistant reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the user message just sent.
    pub message: u64,
    /// Tokens in the assistant reply.
    pub response: u64,
    /// Tokens in the rendered context window.
    pub context: u64,
    /// Sum over the whole stored conversation after this turn.
    pub total: u64,
    /// Tokens in the full prompt sent to the model.
    pub prompt: u64,
}

/// Result of a successful chat turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(rename = "chatId")]
    pub chat_id: String,
    pub model: String,
    pub tokens: TokenUsage,
    /// Number of messages that made up the context window.
    pub context_messages: usize,
}

/// Full history of a chat with its token sum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatHistory {
    pub history: Vec<ChatMessage>,
    pub tokens: u64,
}

/// Portable export of a chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatExport {
    pub id: String,
    pub messages: Vec<ChatMessage>,
    pub tokens: u64,
}

/// Import payload. Both fields are required; they are optional here so a
/// missing field surfaces as a validation error rather than a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatImport {
    pub id: Option<String>,
    pub messages: Option<Vec<ChatMessage>>,
}

/// Outcome of deleting a message by index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDeletion {
    pub total_tokens: u64,
    pub remaining_messages: usize,
    /// Whether the message that followed the deleted one was removed too.
    pub pair_removed: bool,
}
