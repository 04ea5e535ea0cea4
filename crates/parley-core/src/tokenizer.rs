//! TokenCounter trait definition.
//!
//! Token counts are used only for usage accounting; nothing is truncated by
//! token budget. Implementations live in parley-infra (e.g., `TiktokenCounter`).

/// Counts the tokens a piece of text encodes to.
pub trait TokenCounter: Send + Sync {
    fn count_tokens(&self, text: &str) -> u64;
}
