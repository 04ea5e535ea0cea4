//! Business logic and port trait definitions for Parley.
//!
//! This crate defines the "ports" (`ChatStore`, `LlmProvider`,
//! `TokenCounter`) that the infrastructure layer implements, plus the
//! `ChatService` that drives them. It depends only on `parley-types` --
//! never on `parley-infra` or any network/tokenizer crate.

pub mod chat;
pub mod llm;
pub mod models;
pub mod tokenizer;
