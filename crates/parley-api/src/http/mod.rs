//! HTTP layer for Parley.
//!
//! Axum JSON API under `/api/`, the bundled chat page at `/`, and CORS.
//! Every error body is `{"error": "<message>"}`.

pub mod error;
pub mod handlers;
pub mod router;
