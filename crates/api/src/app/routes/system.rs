//! Tenant workspace routes.
//!
//! The area guard in front of this router checks authentication only; which
//! links a role sees comes from `/nav`, computed through `can_access`. Page
//! payloads are stubs standing in for the real workspace views.

use std::sync::Arc;

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use facturo_auth::{Area, PLATFORM_ADMIN_ROUTES, SYSTEM_ROUTES, can_access};
use facturo_guard::ONBOARDED_FALLBACK_ROUTE;

use crate::app::{AppServices, errors};
use crate::cookies::CookieJar;
use crate::middleware::{self, session_store};

pub fn router() -> Router {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/invoices", get(invoices))
        .route("/quotes", get(quotes))
        .route("/customers", get(customers))
        .route("/products", get(products))
        .route("/payments", get(payments))
        .route("/reminders", get(reminders))
        .route("/billing", get(billing))
        .route("/settings", get(settings))
        .route("/onboarding", get(onboarding))
        .route("/onboarding/complete", post(complete_onboarding))
        .route("/whoami", get(whoami))
        .route("/nav", get(nav))
        .layer(axum::middleware::from_fn(middleware::tenant_area_guard))
}

fn page(route: &str) -> Response {
    Json(json!({ "area": "system", "route": route })).into_response()
}

async fn dashboard() -> Response {
    page("dashboard")
}

async fn invoices() -> Response {
    page("invoices")
}

async fn quotes() -> Response {
    page("quotes")
}

async fn customers() -> Response {
    page("customers")
}

async fn products() -> Response {
    page("products")
}

async fn payments() -> Response {
    page("payments")
}

async fn reminders() -> Response {
    page("reminders")
}

async fn billing() -> Response {
    page("billing")
}

async fn settings() -> Response {
    page("settings")
}

async fn onboarding() -> Response {
    page("onboarding")
}

/// Flip the tenant's onboarding flag; the gate stops funneling here from the
/// next request on.
async fn complete_onboarding(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(jar): Extension<Arc<CookieJar>>,
) -> Response {
    let store = session_store(&services, &jar);
    let Some((tenant_id, _)) = store.get_tenant() else {
        return errors::json_error(
            StatusCode::CONFLICT,
            "no_tenant_context",
            "session carries no tenant",
        );
    };

    services.settings.mark_completed(tenant_id);
    tracing::info!(tenant = %tenant_id, "onboarding completed");
    Redirect::to(ONBOARDED_FALLBACK_ROUTE).into_response()
}

/// Who the session belongs to, as the workspace header shows it.
async fn whoami(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(jar): Extension<Arc<CookieJar>>,
) -> Response {
    let store = session_store(&services, &jar);
    let tenant = store.get_tenant();

    Json(json!({
        "role": store.get_role(),
        "tenant_slug": tenant.map(|(_, slug)| slug),
    }))
    .into_response()
}

/// Navigation links the current role may see.
///
/// Non-authoritative by design: hiding a link is a UI affordance, the guards
/// stay the enforcement point.
async fn nav(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(jar): Extension<Arc<CookieJar>>,
) -> Response {
    let store = session_store(&services, &jar);
    let role = store.get_role();

    let system: Vec<&str> = SYSTEM_ROUTES
        .iter()
        .copied()
        .filter(|&route| can_access(Area::System, route, role))
        .collect();
    let platform_admin: Vec<&str> = PLATFORM_ADMIN_ROUTES
        .iter()
        .copied()
        .filter(|&route| can_access(Area::PlatformAdmin, route, role))
        .collect();

    Json(json!({ "system": system, "platform_admin": platform_admin })).into_response()
}
