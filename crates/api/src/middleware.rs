//! Request guards.
//!
//! Adapts the guard protocol to HTTP: the session resolves from the cookie
//! jar, and redirect outcomes become `303 See Other` responses. Each request
//! is one guard mount; the sticky-decision and unmount machinery matters to
//! embedded UI consumers, while here a mount lives exactly as long as the
//! request.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::{Extension, OriginalUri, Request};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use facturo_guard::{
    GuardState, LOGIN_ROUTE, Navigator, OnboardingGate, OnboardingOutcome, RouteGuard,
    SessionSnapshot, SessionSource,
};
use facturo_session::{SessionStore, StorageBackend};

use crate::app::{AppServices, errors};
use crate::cookies::CookieJar;
use crate::settings::SettingsFor;

/// Session store over this request's cookie jar.
pub fn session_store(
    services: &AppServices,
    jar: &Arc<CookieJar>,
) -> SessionStore<Arc<CookieJar>> {
    if services.insecure_cookies {
        SessionStore::without_transport_security(Arc::clone(jar))
    } else {
        SessionStore::new(Arc::clone(jar))
    }
}

/// Session resolution over a store.
struct StoreSessions<'a, B> {
    store: &'a SessionStore<B>,
}

#[async_trait]
impl<B: StorageBackend + Sync> SessionSource for StoreSessions<'_, B> {
    async fn load_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            token: self.store.get_token(),
            role: self.store.get_role(),
        }
    }
}

/// Collects the redirect a guard asks for. Intents go straight to the store,
/// so the parked pathname rides the same response as the redirect.
struct GuardNavigator<'a, B> {
    store: &'a SessionStore<B>,
    destination: Mutex<Option<String>>,
}

impl<'a, B: StorageBackend> GuardNavigator<'a, B> {
    fn new(store: &'a SessionStore<B>) -> Self {
        Self {
            store,
            destination: Mutex::new(None),
        }
    }

    fn take_destination(&self) -> Option<String> {
        self.destination.lock().ok()?.take()
    }
}

impl<B: StorageBackend + Sync> Navigator for GuardNavigator<'_, B> {
    fn remember_intent(&self, path: &str) {
        self.store.remember_intent(path);
    }

    fn navigate(&self, destination: &str) {
        if let Ok(mut slot) = self.destination.lock() {
            *slot = Some(destination.to_string());
        }
    }
}

/// Run one guard mount. `Some` is the denial response.
async fn run_guard<B: StorageBackend + Sync>(
    guard: &RouteGuard,
    store: &SessionStore<B>,
) -> Option<Response> {
    let sessions = StoreSessions { store };
    let navigator = GuardNavigator::new(store);

    match guard.resolve(&sessions, &navigator).await {
        GuardState::Authorized => None,
        GuardState::DeniedUnauthenticated | GuardState::DeniedWrongRole => {
            let destination = navigator
                .take_destination()
                .unwrap_or_else(|| LOGIN_ROUTE.to_string());
            Some(Redirect::to(&destination).into_response())
        }
        // Unreachable for a request-scoped mount (nothing unmounts it), but
        // the protocol says a pending guard renders no content.
        GuardState::Checking => Some(errors::json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "checking",
            "session resolution pending",
        )),
    }
}

/// Tenant-area guard: authentication only, then the onboarding gate.
///
/// Role filtering inside the area is link visibility (`/system/nav`), not
/// page denial.
pub async fn tenant_area_guard(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(jar): Extension<Arc<CookieJar>>,
    OriginalUri(uri): OriginalUri,
    req: Request,
    next: Next,
) -> Response {
    let store = session_store(&services, &jar);
    let path = uri.path().to_string();

    let guard = RouteGuard::tenant_area(path.clone());
    if let Some(denied) = run_guard(&guard, &store).await {
        return denied;
    }

    // Orthogonal gate, layered after authentication: no tenant content until
    // onboarding is behind this tenant.
    let gate = OnboardingGate::new();
    if let Some((tenant_id, _)) = store.get_tenant() {
        let settings = SettingsFor {
            service: &services.settings,
            tenant: tenant_id,
        };
        gate.resolve(&settings).await;
    }

    match gate.outcome(&path) {
        OnboardingOutcome::RedirectTo { destination } => Redirect::to(&destination).into_response(),
        // Pending only occurs without tenant context (e.g. a platform
        // session browsing the area); there is nothing to gate on.
        OnboardingOutcome::Pending | OnboardingOutcome::Render => next.run(req).await,
    }
}

/// Platform-admin guard: authenticated and exactly `SUPER_ADMIN`.
pub async fn platform_admin_guard(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(jar): Extension<Arc<CookieJar>>,
    OriginalUri(uri): OriginalUri,
    req: Request,
    next: Next,
) -> Response {
    let store = session_store(&services, &jar);

    let guard = RouteGuard::platform_admin(uri.path().to_string());
    if let Some(denied) = run_guard(&guard, &store).await {
        return denied;
    }

    next.run(req).await
}
