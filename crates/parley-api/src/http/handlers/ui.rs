//! The bundled chat page.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../../assets/index.html");

/// GET / - Serve the chat UI.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
