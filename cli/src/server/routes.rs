//! # Chat Service Routes
//!
//! File: cli/src/server/routes.rs
//! Author: NSAKCET Development Team
//!
//! ## Overview
//!
//! Builds the Axum router shared by every hosting backend:
//!
//! - `GET /`: the rendered chat page
//! - `POST /get_response`: `{"message": "..."}` in, `{"response": "..."}` out
//! - `GET /static/...`: the page's JavaScript and CSS
//!
//! ## Architecture
//!
//! Handlers share one `AppState` behind an `Arc`. The state is immutable
//! after startup, so requests never contend on a lock. Middleware (request
//! tracing and optional CORS) is applied through a single `ServiceBuilder`.
//!
use super::error::ApiError;
use crate::core::templating::STATIC_PREFIX;
use crate::responder::Responder;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, info, Level};

/// Read-only data every handler needs.
#[derive(Debug)]
pub struct AppState {
    pub responder: Responder,
    /// The chat page, rendered once at startup.
    pub page: String,
    /// Longest accepted message, in characters.
    pub max_message_chars: usize,
}

/// Body of `POST /get_response`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Reply of `POST /get_response`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// # Create Axum Application (`create_app`)
///
/// Wires the routes, the static file service and the middleware around
/// `state`. `enable_cors` switches between a permissive CORS layer and a
/// no-op one.
pub fn create_app(state: Arc<AppState>, static_dir: &Path, enable_cors: bool) -> Router {
    // 1. CORS. `CorsLayer::new()` adds no headers.
    let cors_layer = if enable_cors {
        info!("CORS middleware enabled (permissive).");
        CorsLayer::permissive()
    } else {
        debug!("CORS middleware disabled.");
        CorsLayer::new()
    };

    // 2. Request/response tracing at INFO.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(false))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // 3. Routes, then the middleware stack around all of them.
    Router::new()
        .route("/", get(index))
        .route("/get_response", post(get_response))
        .nest_service(STATIC_PREFIX, ServeDir::new(static_dir))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(cors_layer),
        )
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.page.clone())
}

/// Answers one chat message. Rejected bodies never reach the responder.
async fn get_response(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload?;

    let length = request.message.chars().count();
    if length > state.max_message_chars {
        return Err(ApiError::payload_too_large(format!(
            "Message is {} characters long; the limit is {}.",
            length, state.max_message_chars
        )));
    }

    debug!("Incoming message: {:?}", request.message);
    let response = state.responder.respond(&request.message);
    Ok(Json(ChatResponse { response }))
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Result;
    use crate::responder::{Catalog, MatchPolicy, DEFAULT_FALLBACK_TAG};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    const CATALOG: &str = r#"{"intents": [
        {"tag": "greeting", "patterns": ["Hello", "Hi"], "responses": ["Hello! How can I help?"]},
        {"tag": "unknown", "patterns": ["Something else"], "responses": ["Sorry, I did not get that."]}
    ]}"#;

    fn app(static_dir: &Path, max_message_chars: usize) -> Result<Router> {
        let catalog = Catalog::from_json(CATALOG, DEFAULT_FALLBACK_TAG)?;
        let state = Arc::new(AppState {
            responder: Responder::new(catalog, MatchPolicy::default()),
            page: "<h1>Test College</h1>".to_string(),
            max_message_chars,
        });
        Ok(create_app(state, static_dir, false))
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::post("/get_response")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_index_serves_page() -> Result<()> {
        let dir = TempDir::new()?;
        let response = app(dir.path(), 100)?
            .oneshot(Request::get("/").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        assert_eq!(&bytes[..], b"<h1>Test College</h1>");
        Ok(())
    }

    #[tokio::test]
    async fn test_get_response_answers() -> Result<()> {
        let dir = TempDir::new()?;
        let response = app(dir.path(), 100)?
            .oneshot(post_json(r#"{"message": "hello"}"#))
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["response"], "Hello! How can I help?");
        Ok(())
    }

    #[tokio::test]
    async fn test_message_length_limit() -> Result<()> {
        let dir = TempDir::new()?;
        let body = serde_json::json!({ "message": "a".repeat(11) }).to_string();
        let response = app(dir.path(), 10)?.oneshot(post_json(&body)).await?;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "payload_too_large");
        Ok(())
    }

    #[tokio::test]
    async fn test_limit_counts_characters_not_bytes() -> Result<()> {
        let dir = TempDir::new()?;
        let body = serde_json::json!({ "message": "₹".repeat(10) }).to_string();
        let response = app(dir.path(), 10)?.oneshot(post_json(&body)).await?;
        assert_eq!(response.status(), StatusCode::OK);
        Ok(())
    }

    #[tokio::test]
    async fn test_static_files() -> Result<()> {
        let dir = TempDir::new()?;
        std::fs::create_dir_all(dir.path().join("js"))?;
        std::fs::write(dir.path().join("js/script.js"), "console.log('hi');")?;

        let router = app(dir.path(), 100)?;
        let found = router
            .clone()
            .oneshot(Request::get("/static/js/script.js").body(Body::empty())?)
            .await?;
        assert_eq!(found.status(), StatusCode::OK);

        let missing = router
            .oneshot(Request::get("/static/js/missing.js").body(Body::empty())?)
            .await?;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        Ok(())
    }
}
