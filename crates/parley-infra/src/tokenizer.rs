//! `cl100k_base` token counter built on tiktoken-rs.

use tiktoken_rs::CoreBPE;

use parley_core::tokenizer::TokenCounter;

/// Exact BPE token counter using the `cl100k_base` encoding.
///
/// Special-token text (e.g. `<|endoftext|>`) is encoded as ordinary text.
pub struct TiktokenCounter {
    bpe: CoreBPE,
}

impl TiktokenCounter {
    /// Load the `cl100k_base` ranks (bundled with the crate, no network).
    pub fn cl100k() -> anyhow::Result<Self> {
        let bpe = tiktoken_rs::cl100k_base()?;
        Ok(Self { bpe })
    }
}

impl TokenCounter for TiktokenCounter {
    fn count_tokens(&self, text: &str) -> u64 {
        self.bpe.encode_ordinary(text).len() as u64
    }
}
