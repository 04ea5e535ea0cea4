//! Chat HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/chat                            - Run one chat turn (form-encoded)
//! - DELETE /api/chat/message/{chat_id}/{index}  - Delete a message and its follower
//! - POST   /api/chat/clear/{chat_id}            - Reset a chat to empty
//! - GET    /api/chat/history/{chat_id}          - Full history with token sum
//! - GET    /api/chat/export/{chat_id}           - Portable export
//! - POST   /api/chat/import                     - Replace a chat from an export

use axum::Form;
use axum::Json;
use axum::extract::rejection::{FormRejection, JsonRejection, PathRejection};
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use parley_types::chat::{
    ChatExport, ChatHistory, ChatImport, ChatReply, MessageDeletion, SendMessage,
};

use crate::http::error::AppError;
use crate::state::AppState;

const MISSING_FIELDS: &str = "Chat ID and message are required";

/// Form body of `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct SendMessageForm {
    #[serde(rename = "chatId")]
    pub chat_id: Option<String>,
    pub message: Option<String>,
    pub model: Option<String>,
}

/// Body of a successful delete: the deletion summary plus `success: true`.
#[derive(Debug, Serialize)]
pub struct DeletionResponse {
    pub success: bool,
    #[serde(flatten)]
    pub deletion: MessageDeletion,
}

/// POST /api/chat - Run one chat turn.
///
/// A body that cannot be read as a form is treated like one with no fields.
pub async fn send_message(
    State(state): State<AppState>,
    form: Result<Form<SendMessageForm>, FormRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let Form(form) = form.map_err(|e| {
        tracing::debug!("Unreadable chat form: {e}");
        AppError::Validation(MISSING_FIELDS.to_string())
    })?;

    let request = SendMessage {
        chat_id: form.chat_id.unwrap_or_default(),
        message: form.message.unwrap_or_default(),
        model: form.model,
    };

    let reply = state.chat_service.send_message(request).await?;
    Ok(Json(reply))
}

/// DELETE /api/chat/message/{chat_id}/{index}
pub async fn delete_message(
    State(state): State<AppState>,
    path: Result<Path<(String, usize)>, PathRejection>,
) -> Result<Json<DeletionResponse>, AppError> {
    let Path((chat_id, index)) = path.map_err(|e| {
        tracing::debug!("Bad delete path: {e}");
        AppError::Validation("Message index must be a non-negative integer".to_string())
    })?;

    let deletion = state.chat_service.delete_message(&chat_id, index).await?;
    Ok(Json(DeletionResponse {
        success: true,
        deletion,
    }))
}

/// POST /api/chat/clear/{chat_id}
pub async fn clear_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.chat_service.clear_chat(&chat_id).await?;
    Ok(Json(json!({ "success": true })))
}

/// GET /api/chat/history/{chat_id}
pub async fn get_history(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<Json<ChatHistory>, AppError> {
    Ok(Json(state.chat_service.history(&chat_id).await?))
}

/// GET /api/chat/export/{chat_id}
pub async fn export_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<Json<ChatExport>, AppError> {
    Ok(Json(state.chat_service.export_chat(&chat_id).await?))
}

/// POST /api/chat/import
///
/// Any body that does not parse as `{id, messages}` is "Invalid chat data".
pub async fn import_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatImport>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(import) = payload.map_err(|e| {
        tracing::debug!("Rejected import body: {e}");
        AppError::Validation("Invalid chat data".to_string())
    })?;

    state.chat_service.import_chat(import).await?;
    Ok(Json(json!({ "success": true })))
}
