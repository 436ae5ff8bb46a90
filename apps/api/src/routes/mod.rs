pub mod health;

use axum::{routing::get, Router};

use crate::chat::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/ask",
            get(handlers::handle_ask).post(handlers::handle_ask),
        )
        .route(
            "/api/ask-stream",
            get(handlers::handle_ask_stream).post(handlers::handle_ask_stream),
        )
        .route("/api/suggest", get(handlers::handle_suggest))
        .route("/api/debug", get(handlers::handle_debug))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::chat::assistant::Assistant;
    use crate::config::Config;
    use crate::resume::models::CanonicalResume;
    use crate::retrieval::Retriever;

    fn app() -> Router {
        let resume = CanonicalResume {
            name: Some("Sam Doe".to_string()),
            skills: vec!["Rust".to_string(), "SQL".to_string()],
            ..Default::default()
        };
        let config = Config::from_lookup(|_| None).unwrap();
        build_router(AppState {
            assistant: Arc::new(Assistant::new(resume, Retriever::lexical(), None, 6)),
            config,
            resume_candidates: Arc::new(vec![PathBuf::from("/nonexistent/resume.json")]),
        })
    }

    async fn send(request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_ask_shortcut_via_post_and_get() {
        let (status, body) = send(post_json("/api/ask", json!({ "question": "skills" }))).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["answer"], "Sam Doe's primary skills include Rust, SQL.");

        let (status, _) = send(Request::get("/api/ask?q=skills").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ask_missing_question_is_400() {
        let (status, body) = send(post_json("/api/ask", json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_ask_without_backend_is_502() {
        let (status, body) = send(post_json("/api/ask", json!({ "q": "Where is Sam based?" }))).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"]["code"], "LLM_ERROR");
    }

    #[tokio::test]
    async fn test_ask_stream_single_event() {
        let response = app()
            .oneshot(post_json("/api/ask-stream", json!({ "question": "skills" })))
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/event-stream"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.starts_with("data: {\"answer\":"));
        assert!(text.ends_with("\n\n"));
    }

    #[tokio::test]
    async fn test_suggest_and_debug() {
        let (status, body) = send(Request::get("/api/suggest").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        let prompts: Vec<String> = serde_json::from_slice(&body).unwrap();
        assert!(!prompts.is_empty());

        let (status, body) = send(Request::get("/api/debug").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["has_key"], false);
        assert_eq!(body["strategy"], "lexical");
        assert_eq!(body["fragments"], 2);
        assert_eq!(body["resume_candidates"][0]["exists"], false);
    }
}
