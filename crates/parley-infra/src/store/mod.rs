//! Chat store implementations.

pub mod memory;

pub use memory::InMemoryChatStore;
