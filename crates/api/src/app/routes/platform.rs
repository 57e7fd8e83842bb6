//! Platform administration routes (cross-tenant oversight).
//!
//! The guard in front of this router turns every non-`SUPER_ADMIN` session
//! away from the whole area, not route by route.

use std::sync::Arc;

use axum::extract::Extension;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::app::AppServices;
use crate::middleware;

pub fn router() -> Router {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/tenants", get(tenants))
        .route("/plans", get(plans))
        .layer(axum::middleware::from_fn(middleware::platform_admin_guard))
}

async fn dashboard() -> Response {
    Json(json!({ "area": "platform-admin", "route": "dashboard" })).into_response()
}

async fn tenants(Extension(services): Extension<Arc<AppServices>>) -> Response {
    let tenants = services.identity.tenants().await;
    Json(json!({ "tenants": tenants })).into_response()
}

async fn plans() -> Response {
    // Static catalogue until a billing backend exists.
    Json(json!({
        "plans": [
            { "id": "trial", "name": "Trial", "invoice_limit": 10 },
            { "id": "starter", "name": "Starter", "invoice_limit": 100 },
            { "id": "professional", "name": "Professional", "invoice_limit": null },
        ]
    }))
    .into_response()
}
