//! Onboarding sub-guard.
//!
//! A second, orthogonal gate inside the tenant area: until the tenant's
//! onboarding flag resolves true, every tenant path funnels to the
//! onboarding destination. Once it is true, the onboarding destination
//! itself redirects away. Layered strictly after authentication, before
//! content.

use std::sync::Mutex;

use async_trait::async_trait;

/// Where incomplete tenants are sent.
pub const ONBOARDING_ROUTE: &str = "/system/onboarding";

/// Where finished tenants land when they revisit onboarding.
pub const ONBOARDED_FALLBACK_ROUTE: &str = "/system/dashboard";

/// External collaborator: tenant settings resolution.
///
/// The gate does not know how settings are fetched or cached. `None` means
/// the settings could not be resolved; the gate stays in
/// [`OnboardingState::AwaitingSettings`] and may be re-resolved.
#[async_trait]
pub trait TenantSettingsSource: Send + Sync {
    async fn onboarding_completed(&self) -> Option<bool>;
}

/// Gate states, driven solely by the external flag's resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingState {
    /// Settings fetch outstanding (or failed); render a loading affordance,
    /// no redirect yet.
    AwaitingSettings,
    /// Flag resolved false: force navigation to [`ONBOARDING_ROUTE`].
    MustOnboard,
    /// Flag resolved true: onboarding is behind this tenant.
    Onboarded,
}

/// What the gate does for a given current path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnboardingOutcome {
    /// Still waiting on settings; no redirect may fire.
    Pending,
    /// Render the requested content.
    Render,
    /// Navigate elsewhere first.
    RedirectTo { destination: String },
}

/// The onboarding gate for one mounted tenant-area view.
pub struct OnboardingGate {
    state: Mutex<OnboardingState>,
}

impl OnboardingGate {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(OnboardingState::AwaitingSettings),
        }
    }

    pub fn state(&self) -> OnboardingState {
        *self.lock_state()
    }

    /// Await the settings resolution and transition accordingly. An
    /// unresolved fetch leaves the gate awaiting, to be resolved again on
    /// the next mount.
    pub async fn resolve(&self, settings: &dyn TenantSettingsSource) -> OnboardingState {
        let resolved = settings.onboarding_completed().await;

        let mut state = self.lock_state();
        if let Some(completed) = resolved {
            *state = if completed {
                OnboardingState::Onboarded
            } else {
                OnboardingState::MustOnboard
            };
        }
        *state
    }

    /// Outcome for the path the user is on, given the current state.
    pub fn outcome(&self, current_path: &str) -> OnboardingOutcome {
        outcome_for(self.state(), current_path)
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, OnboardingState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for OnboardingGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Pure decision table for the gate.
///
/// Sub-paths of the onboarding destination (its steps and actions) count as
/// being on it.
pub fn outcome_for(state: OnboardingState, current_path: &str) -> OnboardingOutcome {
    let on_onboarding = current_path == ONBOARDING_ROUTE
        || current_path
            .strip_prefix(ONBOARDING_ROUTE)
            .is_some_and(|rest| rest.starts_with('/'));

    match state {
        OnboardingState::AwaitingSettings => OnboardingOutcome::Pending,
        OnboardingState::MustOnboard if on_onboarding => OnboardingOutcome::Render,
        OnboardingState::MustOnboard => OnboardingOutcome::RedirectTo {
            destination: ONBOARDING_ROUTE.to_string(),
        },
        OnboardingState::Onboarded if on_onboarding => OnboardingOutcome::RedirectTo {
            destination: ONBOARDED_FALLBACK_ROUTE.to_string(),
        },
        OnboardingState::Onboarded => OnboardingOutcome::Render,
    }
}
