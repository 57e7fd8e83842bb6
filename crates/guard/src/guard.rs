//! The per-mount guard state machine.
//!
//! A [`RouteGuard`] is created when a protected view mounts and decides at
//! most once: `Checking` transitions to exactly one terminal state, and the
//! decision is sticky for the mount's lifetime. Unrelated re-renders never
//! flip it back; a fresh navigation constructs a fresh guard.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use facturo_auth::Role;

use crate::decision::{
    GuardOutcome, GuardRequirement, LOGIN_ROUTE, SessionSnapshot, decide,
};

/// Asynchronous session resolution boundary.
///
/// The HTTP layer implements this over cookie-backed storage; tests implement
/// it with controllable delays to exercise the unmount race.
#[async_trait]
pub trait SessionSource: Send + Sync {
    async fn load_snapshot(&self) -> SessionSnapshot;
}

/// The framework-specific redirect mechanism.
///
/// Guards are the only callers; no other component navigates as a side
/// effect of an authorization check.
pub trait Navigator: Send + Sync {
    /// Park the denied pathname for the post-login return trip.
    fn remember_intent(&self, path: &str);
    /// Perform the redirect.
    fn navigate(&self, destination: &str);
}

/// Guard lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Session resolution outstanding. Render a neutral loading affordance;
    /// no redirect may fire yet.
    Checking,
    /// Session valid and permitted. Children render for the rest of the
    /// mount without re-checking.
    Authorized,
    /// No valid session. The intent was parked and the login redirect fired.
    DeniedUnauthenticated,
    /// Session valid, role not permitted for the area. The fallback redirect
    /// fired.
    DeniedWrongRole,
}

/// A mounted guard instance.
pub struct RouteGuard {
    requirement: GuardRequirement,
    requested_path: String,
    state: Mutex<GuardState>,
    unmounted: AtomicBool,
}

impl RouteGuard {
    pub fn new(requirement: GuardRequirement, requested_path: impl Into<String>) -> Self {
        Self {
            requirement,
            requested_path: requested_path.into(),
            state: Mutex::new(GuardState::Checking),
            unmounted: AtomicBool::new(false),
        }
    }

    /// Tenant-area guard: authentication only. Role filtering inside the
    /// area is link visibility, handled by `facturo_auth::can_access`.
    pub fn tenant_area(requested_path: impl Into<String>) -> Self {
        Self::new(GuardRequirement::Authenticated, requested_path)
    }

    /// Platform-admin guard: authenticated and exactly `SUPER_ADMIN`.
    pub fn platform_admin(requested_path: impl Into<String>) -> Self {
        Self::new(GuardRequirement::ExactRole(Role::SuperAdmin), requested_path)
    }

    pub fn state(&self) -> GuardState {
        *self.lock_state()
    }

    pub fn requested_path(&self) -> &str {
        &self.requested_path
    }

    /// Signal that the consumer went away. A resolution still in flight
    /// must not fire any redirect after this.
    pub fn unmount(&self) {
        self.unmounted.store(true, Ordering::SeqCst);
    }

    pub fn is_unmounted(&self) -> bool {
        self.unmounted.load(Ordering::SeqCst)
    }

    /// Resolve the guard: await the session snapshot, decide, record the
    /// terminal state, and perform the redirect (if any) through `navigator`.
    ///
    /// The transition fires at most once per mount. A call after the
    /// decision returns the recorded state without touching the session
    /// source again. A resolution that completes after [`unmount`] records
    /// nothing and performs no side effect.
    ///
    /// [`unmount`]: Self::unmount
    pub async fn resolve(
        &self,
        sessions: &dyn SessionSource,
        navigator: &dyn Navigator,
    ) -> GuardState {
        let current = self.state();
        if current != GuardState::Checking {
            return current;
        }

        let snapshot = sessions.load_snapshot().await;

        if self.is_unmounted() {
            return GuardState::Checking;
        }

        let outcome = decide(self.requirement, &snapshot, &self.requested_path);

        let mut state = self.lock_state();
        if *state != GuardState::Checking {
            // Decided concurrently; that resolution already performed the
            // side effect.
            return *state;
        }

        *state = match outcome {
            GuardOutcome::Render => GuardState::Authorized,
            GuardOutcome::RedirectToLogin { .. } => GuardState::DeniedUnauthenticated,
            GuardOutcome::RedirectTo { .. } => GuardState::DeniedWrongRole,
        };

        match outcome {
            GuardOutcome::Render => {}
            GuardOutcome::RedirectToLogin { remember } => {
                tracing::warn!(path = %self.requested_path, "unauthenticated access, redirecting to login");
                navigator.remember_intent(&remember);
                navigator.navigate(LOGIN_ROUTE);
            }
            GuardOutcome::RedirectTo { destination } => {
                tracing::warn!(path = %self.requested_path, "role not permitted, redirecting");
                navigator.navigate(&destination);
            }
        }

        *state
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, GuardState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
