//! Chat history storage abstraction, context windowing, and the chat service.

pub mod context;
pub mod service;
pub mod store;
