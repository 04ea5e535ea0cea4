//! Infrastructure layer for Parley.
//!
//! Contains implementations of the port traits defined in `parley-core`:
//! the DashMap-backed chat store, the Gemini REST client, the tiktoken
//! token counter, plus configuration loading.

pub mod config;
pub mod llm;
pub mod store;
pub mod tokenizer;
