use thiserror::Error;

use crate::llm::LlmError;

/// Message returned to the client when a reply was withheld by the
/// provider's safety filter.
pub const FILTERED_MESSAGE: &str =
    "Response was filtered for safety reasons. Please try rephrasing your message.";

/// Errors surfaced by the chat service.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    Validation(String),

    #[error("Chat not found")]
    NotFound,

    #[error("Message index out of range")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Response was filtered for safety reasons. Please try rephrasing your message.")]
    Filtered,

    #[error("{0}")]
    Provider(String),

    #[error("Invalid response from language model")]
    InvalidResponse,

    #[error("{0}")]
    Internal(String),
}

impl From<LlmError> for ChatError {
    fn from(e: LlmError) -> Self {
        if e.is_filtered() {
            return ChatError::Filtered;
        }
        match e {
            LlmError::InvalidResponse(_) => ChatError::InvalidResponse,
            other => ChatError::Provider(other.to_string()),
        }
    }
}

impl From<StoreError> for ChatError {
    fn from(e: StoreError) -> Self {
        ChatError::Internal(e.to_string())
    }
}

/// Errors from chat store operations (used by trait definitions in parley-core).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Errors from loading server configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}
