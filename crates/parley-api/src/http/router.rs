//! Axum router configuration with middleware.
//!
//! The JSON API lives under `/api/`. `/` serves the bundled chat page, and
//! the configured static directory is mounted at `/static` when it exists.
//! Middleware: CORS, tracing, panic recovery.

use std::any::Any as PanicPayload;

use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/chat", post(handlers::chat::send_message))
        .route(
            "/chat/message/{chat_id}/{index}",
            delete(handlers::chat::delete_message),
        )
        .route("/chat/clear/{chat_id}", post(handlers::chat::clear_chat))
        .route("/chat/history/{chat_id}", get(handlers::chat::get_history))
        .route("/chat/export/{chat_id}", get(handlers::chat::export_chat))
        .route("/chat/import", post(handlers::chat::import_chat))
        .route("/models", get(handlers::models::list_models));

    let static_dir = state.config.static_dir.clone();

    let mut router = Router::new()
        .route("/", get(handlers::ui::index))
        .route("/health", get(health_check))
        .nest("/api", api_routes);

    if std::path::Path::new(&static_dir).is_dir() {
        router = router.nest_service("/static", ServeDir::new(&static_dir));
        tracing::info!(path = %static_dir, "Static file serving enabled");
    }

    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Turn a handler panic into a 500 with the usual error body.
fn panic_response(payload: Box<dyn PanicPayload + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    tracing::error!(panic = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(serde_json::json!({ "error": "Internal server error" })),
    )
        .into_response()
}

/// GET /health - Liveness check.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::{Request, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use parley_core::llm::box_provider::BoxLlmProvider;
    use parley_core::llm::provider::LlmProvider;
    use parley_types::config::ServerConfig;
    use parley_types::error::FILTERED_MESSAGE;
    use parley_types::llm::{Completion, GenerationRequest, LlmError};

    /// Replies from a script, then echoes "ok" once the script runs out.
    struct ScriptedProvider {
        script: Mutex<VecDeque<Result<String, LlmError>>>,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, request: &GenerationRequest) -> Result<Completion, LlmError> {
            self.prompts.lock().unwrap().push(request.prompt.clone());
            let next = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok("ok".to_string()));
            next.map(|text| Completion {
                text,
                provider: "scripted".to_string(),
                finish_reason: Some("STOP".to_string()),
            })
        }
    }

    /// Fails in a way the service never maps to an error.
    struct PanickingProvider;

    impl LlmProvider for PanickingProvider {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn generate(&self, _request: &GenerationRequest) -> Result<Completion, LlmError> {
            panic!("provider blew up")
        }
    }

    fn router_for(provider: BoxLlmProvider) -> Router {
        let config = ServerConfig {
            static_dir: "does-not-exist-for-tests".to_string(),
            ..ServerConfig::default()
        };
        build_router(AppState::with_provider(config, provider).unwrap())
    }

    fn app_with(script: Vec<Result<String, LlmError>>) -> (Router, Arc<Mutex<Vec<String>>>) {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let provider = ScriptedProvider {
            script: Mutex::new(script.into()),
            prompts: prompts.clone(),
        };
        (router_for(BoxLlmProvider::new(provider)), prompts)
    }

    fn app() -> Router {
        app_with(Vec::new()).0
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, form: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn delete_req(uri: &str) -> Request<Body> {
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn import(app: &Router, id: &str, messages: Value) {
        let body = json!({ "id": id, "messages": messages }).to_string();
        let (status, _) = send(app, post_json("/api/chat/import", &body)).await;
        assert_eq!(status, StatusCode::OK);
    }

    // --- Misc routes ---

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = send(&app(), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn index_serves_html() {
        let response = app().oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
    }

    #[tokio::test]
    async fn models_lists_catalog() {
        let (status, body) = send(&app(), get("/api/models")).await;
        assert_eq!(status, StatusCode::OK);
        let models = body["models"].as_array().unwrap();
        assert_eq!(models.len(), 4);
        assert_eq!(models[0], "gemini-2.0-flash");
    }

    // --- Chat turn ---

    #[tokio::test]
    async fn chat_turn_returns_reply_and_tokens() {
        let (app, prompts) = app_with(vec![Ok("Hi there".to_string())]);

        let (status, body) = send(&app, post_form("/api/chat", "chatId=c1&message=hello")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "Hi there");
        assert_eq!(body["chatId"], "c1");
        assert_eq!(body["model"], "gemini-2.0-flash");
        assert_eq!(body["context_messages"], 1);

        let tokens = &body["tokens"];
        let message = tokens["message"].as_u64().unwrap();
        let response = tokens["response"].as_u64().unwrap();
        assert!(message > 0 && response > 0);
        assert_eq!(tokens["total"].as_u64().unwrap(), message + response);

        assert_eq!(
            prompts.lock().unwrap()[0],
            "Previous conversation:\nUser: hello\n\nUser: hello\nAssistant:"
        );

        let (_, history) = send(&app, get("/api/chat/history/c1")).await;
        assert_eq!(history["history"].as_array().unwrap().len(), 2);
        assert_eq!(history["history"][1]["role"], "assistant");
        assert_eq!(history["tokens"], tokens["total"]);
    }

    #[tokio::test]
    async fn chat_turn_honors_model_field() {
        let app = app();
        let (status, body) = send(
            &app,
            post_form("/api/chat", "chatId=c1&message=hi&model=gemini-2.0-pro-exp-02-05"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model"], "gemini-2.0-pro-exp-02-05");
    }

    #[tokio::test]
    async fn chat_turn_requires_chat_id_and_message() {
        let app = app();
        for form in ["chatId=c1", "message=hello", "chatId=&message=hello", ""] {
            let (status, body) = send(&app, post_form("/api/chat", form)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "form: {form:?}");
            assert_eq!(body["error"], "Chat ID and message are required");
        }

        let (_, history) = send(&app, get("/api/chat/history/c1")).await;
        assert_eq!(history["history"], json!([]));
    }

    #[tokio::test]
    async fn chat_turn_with_json_body_is_rejected_as_missing_fields() {
        let (status, body) = send(
            &app(),
            post_json("/api/chat", r#"{"chatId":"c1","message":"hi"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Chat ID and message are required");
    }

    #[tokio::test]
    async fn filtered_reply_is_forbidden() {
        let (app, _) = app_with(vec![
            Err(LlmError::Filtered {
                reason: "SAFETY".to_string(),
            }),
            Err(LlmError::Provider {
                message: "candidate blocked: RECITATION".to_string(),
            }),
        ]);

        for _ in 0..2 {
            let (status, body) = send(&app, post_form("/api/chat", "chatId=c1&message=hi")).await;
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert_eq!(body["error"], FILTERED_MESSAGE);
        }

        // The user messages stay recorded; no assistant reply was added.
        let (_, history) = send(&app, get("/api/chat/history/c1")).await;
        let roles: Vec<&str> = history["history"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["role"].as_str().unwrap())
            .collect();
        assert_eq!(roles, vec!["user", "user"]);
    }

    #[tokio::test]
    async fn provider_failure_is_server_error() {
        let (app, _) = app_with(vec![
            Err(LlmError::Provider {
                message: "HTTP 500: backend exploded".to_string(),
            }),
            Ok(String::new()),
        ]);

        let (status, body) = send(&app, post_form("/api/chat", "chatId=c1&message=hi")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "HTTP 500: backend exploded");

        let (status, body) = send(&app, post_form("/api/chat", "chatId=c1&message=hi")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Invalid response from language model");
    }

    #[tokio::test]
    async fn handler_panic_becomes_server_error() {
        let app = router_for(BoxLlmProvider::new(PanickingProvider));

        let (status, body) = send(&app, post_form("/api/chat", "chatId=c1&message=hi")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Internal server error" }));

        // The server keeps serving after the panic.
        let (status, _) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
    }

    // --- History maintenance ---

    #[tokio::test]
    async fn unseen_chat_history_is_empty_but_export_is_not_found() {
        let app = app();
        let (status, body) = send(&app, get("/api/chat/history/nobody")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "history": [], "tokens": 0 }));

        let (status, body) = send(&app, get("/api/chat/export/never-seen")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Chat not found" }));
    }

    #[tokio::test]
    async fn import_then_export_round_trips() {
        let app = app();
        let messages = json!([
            { "role": "user", "content": "Q", "tokens": 3 },
            { "role": "assistant", "content": "A", "tokens": 4 },
        ]);
        import(&app, "c9", messages.clone()).await;

        let (status, body) = send(&app, get("/api/chat/export/c9")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "c9");
        assert_eq!(body["messages"], messages);
        assert_eq!(body["tokens"], 7);
    }

    #[tokio::test]
    async fn import_without_token_counts_exports_zero() {
        let app = app();
        import(
            &app,
            "c2",
            json!([
                { "role": "user", "content": "no count here" },
                { "role": "assistant", "content": "counted", "tokens": 6 },
            ]),
        )
        .await;

        let (status, body) = send(&app, get("/api/chat/export/c2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["messages"],
            json!([
                { "role": "user", "content": "no count here", "tokens": 0 },
                { "role": "assistant", "content": "counted", "tokens": 6 },
            ])
        );
        assert_eq!(body["tokens"], 6);
    }

    #[tokio::test]
    async fn import_rejects_bad_payloads() {
        let app = app();
        for body in [
            "not json",
            r#"{"id":"c1"}"#,
            r#"{"messages":[]}"#,
            r#"{"id":"c1","messages":[{"role":"system","content":"x"}]}"#,
        ] {
            let (status, response) = send(&app, post_json("/api/chat/import", body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(response["error"], "Invalid chat data");
        }
    }

    #[tokio::test]
    async fn delete_removes_pair_then_single() {
        let app = app();
        import(
            &app,
            "c1",
            json!([
                { "role": "user", "content": "Q1", "tokens": 1 },
                { "role": "assistant", "content": "A1", "tokens": 2 },
                { "role": "user", "content": "Q2", "tokens": 4 },
            ]),
        )
        .await;

        let (status, body) = send(&app, delete_req("/api/chat/message/c1/0")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "success": true,
                "total_tokens": 4,
                "remaining_messages": 1,
                "pair_removed": true,
            })
        );

        let (status, body) = send(&app, delete_req("/api/chat/message/c1/0")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pair_removed"], false);
        assert_eq!(body["remaining_messages"], 0);
    }

    #[tokio::test]
    async fn delete_reports_errors() {
        let app = app();
        import(
            &app,
            "c1",
            json!([{ "role": "user", "content": "Q1", "tokens": 1 }]),
        )
        .await;

        let (status, body) = send(&app, delete_req("/api/chat/message/c1/1")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Message index out of range");

        let (status, _) = send(&app, delete_req("/api/chat/message/c1/abc")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, delete_req("/api/chat/message/c1/-1")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, delete_req("/api/chat/message/ghost/0")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Chat not found");
    }

    #[tokio::test]
    async fn clear_empties_seen_and_unseen_chats() {
        let app = app();
        import(
            &app,
            "c1",
            json!([{ "role": "user", "content": "Q1", "tokens": 5 }]),
        )
        .await;

        for id in ["c1", "fresh"] {
            let (status, body) =
                send(&app, post_form(&format!("/api/chat/clear/{id}"), "")).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({ "success": true }));

            let (_, history) = send(&app, get(&format!("/api/chat/history/{id}"))).await;
            assert_eq!(history, json!({ "history": [], "tokens": 0 }));
        }

        // Clearing creates the chat, so export now succeeds.
        let (status, body) = send(&app, get("/api/chat/export/fresh")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["messages"], json!([]));
    }
}
