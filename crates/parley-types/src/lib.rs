//! Shared domain types for Parley.
//!
//! This crate contains the types passed between the chat service, its
//! adapters, and the HTTP layer: chat messages, LLM requests/responses,
//! server configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
