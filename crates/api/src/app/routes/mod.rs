use axum::Json;
use axum::response::IntoResponse;
use serde_json::json;

pub mod auth;
pub mod platform;
pub mod system;

/// Liveness probe; unauthenticated by design.
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
