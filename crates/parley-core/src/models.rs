//! Static catalog of the models offered to clients.

use serde::Serialize;

/// Model used when a request does not pick one.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Models the chat UI may select, in display order.
pub const SUPPORTED_MODELS: &[&str] = &[
    "gemini-2.0-flash",
    "gemini-2.0-flash-lite-preview-02-05",
    "gemini-2.0-pro-exp-02-05",
    "gemini-2.0-flash-thinking-exp-01-21",
];

/// Response body for the model listing.
#[derive(Debug, Clone, Serialize)]
pub struct ModelCatalog {
    pub models: Vec<&'static str>,
}

pub fn catalog() -> ModelCatalog {
    ModelCatalog {
        models: SUPPORTED_MODELS.to_vec(),
    }
}
