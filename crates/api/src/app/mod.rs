//! HTTP application wiring (axum router + service wiring).
//!
//! Layout:
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `errors.rs`: consistent error responses
//! - `crate::middleware`: the request guards wrapping protected routers

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::cookies;
use crate::identity::{IdentityProvider, MockDirectory};
use crate::settings::TenantSettingsService;

pub mod errors;
pub mod routes;

/// Server configuration knobs.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Drop the `Secure` cookie attribute. Plain-HTTP local development
    /// only.
    pub insecure_cookies: bool,
}

/// Shared service handles.
pub struct AppServices {
    pub identity: Arc<dyn IdentityProvider>,
    pub settings: Arc<TenantSettingsService>,
    pub insecure_cookies: bool,
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: AppConfig) -> Router {
    let identity = Arc::new(MockDirectory::with_demo_data());
    let settings = Arc::new(TenantSettingsService::new());

    // Demo tenants are past onboarding; tenants created through signup start
    // fresh and get funneled through the onboarding gate.
    for tenant in identity.tenants().await {
        settings.mark_completed(tenant.id);
    }

    let services = Arc::new(AppServices {
        identity,
        settings,
        insecure_cookies: config.insecure_cookies,
    });

    Router::new()
        .route("/health", get(routes::health))
        .route("/login", get(routes::auth::login_page))
        .nest("/auth", routes::auth::router())
        .nest("/system", routes::system::router())
        .nest("/platform-admin", routes::platform::router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(cookies::cookie_layer))
                .layer(Extension(services)),
        )
}
