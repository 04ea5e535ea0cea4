//! LlmProvider trait definition.
//!
//! This is the core abstraction that every LLM backend implements.

use parley_types::llm::{Completion, GenerationRequest, LlmError};

/// Trait for LLM provider backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in parley-infra (e.g., `GeminiProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send a prompt and receive the full generated text.
    ///
    /// Safety-filter rejections must be reported as `LlmError::Filtered`
    /// (or carry the recitation marker in their text).
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl std::future::Future<Output = Result<Completion, LlmError>> + Send;
}
