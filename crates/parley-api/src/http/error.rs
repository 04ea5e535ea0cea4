//! Application error type mapping to HTTP status codes and the flat
//! `{"error": message}` body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use parley_types::error::ChatError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Chat service errors.
    Chat(ChatError),
    /// Malformed request that never reached the service.
    Validation(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Chat(ChatError::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::Chat(ChatError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Chat(ChatError::IndexOutOfRange { .. }) => StatusCode::BAD_REQUEST,
            AppError::Chat(ChatError::Filtered) => StatusCode::FORBIDDEN,
            AppError::Chat(
                ChatError::Provider(_) | ChatError::InvalidResponse | ChatError::Internal(_),
            ) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn message(&self) -> String {
        match self {
            AppError::Chat(e) => e.to_string(),
            AppError::Validation(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %message, "Request failed");
        } else if status == StatusCode::FORBIDDEN {
            tracing::warn!("Response withheld by safety filter");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_errors_map_to_statuses() {
        let cases = [
            (ChatError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ChatError::NotFound, StatusCode::NOT_FOUND),
            (
                ChatError::IndexOutOfRange { index: 3, len: 2 },
                StatusCode::BAD_REQUEST,
            ),
            (ChatError::Filtered, StatusCode::FORBIDDEN),
            (
                ChatError::Provider("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ChatError::InvalidResponse, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn message_is_the_display_text() {
        assert_eq!(
            AppError::from(ChatError::IndexOutOfRange { index: 3, len: 2 }).message(),
            "Message index out of range"
        );
        assert_eq!(
            AppError::Validation("Invalid chat data".into()).message(),
            "Invalid chat data"
        );
    }
}
