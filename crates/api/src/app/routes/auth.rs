//! Login, signup, and logout flows.
//!
//! These are the only call sites that write the session pair, and logout is
//! the only one that clears it. Role always comes from the identity-provider
//! record; nothing about the credential itself is ever interpreted.

use std::sync::Arc;

use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use facturo_auth::landing_route;
use facturo_core::TenantSlug;
use facturo_guard::LOGIN_ROUTE;
use facturo_session::SessionStore;

use crate::app::{AppServices, errors};
use crate::cookies::CookieJar;
use crate::identity::{Identity, RegistrationError, TenantRegistration, mint_access_token};
use crate::middleware::session_store;

pub fn router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup))
        .route("/logout", post(logout))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub tenant_slug: String,
}

/// The login interstitial. Redirect target of every unauthenticated denial.
pub async fn login_page() -> impl IntoResponse {
    Json(json!({ "page": "login" }))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(jar): Extension<Arc<CookieJar>>,
    Json(body): Json<LoginRequest>,
) -> Response {
    let Some(identity) = services
        .identity
        .authenticate(&body.email, &body.password)
        .await
    else {
        return errors::json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "invalid credentials",
        );
    };

    let store = session_store(&services, &jar);
    finish_authentication(&store, &identity)
}

pub async fn signup(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(jar): Extension<Arc<CookieJar>>,
    Json(body): Json<SignupRequest>,
) -> Response {
    if body.email.trim().is_empty() || !body.email.contains('@') {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_email", "invalid email format");
    }

    let slug = match TenantSlug::new(body.tenant_slug) {
        Ok(slug) => slug,
        Err(e) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_slug", e.to_string());
        }
    };

    let registration = TenantRegistration {
        email: body.email.trim().to_lowercase(),
        password: body.password,
        slug,
    };
    let identity = match services.identity.register_tenant(registration).await {
        Ok(identity) => identity,
        Err(e @ (RegistrationError::EmailTaken | RegistrationError::SlugTaken)) => {
            return errors::json_error(StatusCode::CONFLICT, "registration_conflict", e.to_string());
        }
    };

    let store = session_store(&services, &jar);
    finish_authentication(&store, &identity)
}

pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(jar): Extension<Arc<CookieJar>>,
) -> Response {
    let store = session_store(&services, &jar);
    store.clear_all();
    tracing::info!("logged out");
    Redirect::to(LOGIN_ROUTE).into_response()
}

/// Shared tail of login and signup: one session-pair write, the tenant pair
/// for non-platform roles, then the return trip.
fn finish_authentication(store: &SessionStore<Arc<CookieJar>>, identity: &Identity) -> Response {
    let token = mint_access_token();
    store.set_session(&token, identity.role);
    match &identity.tenant {
        Some((tenant_id, slug)) => store.set_tenant(*tenant_id, slug),
        // Platform sessions carry no tenant context, even when a tenant
        // session was active in this browser before.
        None => store.clear_tenant(),
    }

    // The parked destination wins over the role landing route, and is gone
    // after this.
    let destination = store
        .take_intent()
        .unwrap_or_else(|| landing_route(identity.role).to_string());

    tracing::info!(email = %identity.email, role = %identity.role, "authenticated");
    Redirect::to(&destination).into_response()
}
