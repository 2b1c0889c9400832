//! Axum router configuration with middleware.
//!
//! All routes are under `/api/`. Middleware: CORS, request tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_check))
        // Sessions
        .route("/api/sessions", post(handlers::session::create_session))
        .route("/api/sessions/{id}", get(handlers::session::get_session))
        // Messages
        .route(
            "/api/messages/{session_id}",
            get(handlers::session::get_messages),
        )
        // Chat
        .route("/api/chat", post(handlers::chat::chat))
        .route("/api/chat/stream", post(handlers::chat::stream_chat))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /api/health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
