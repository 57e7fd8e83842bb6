//! `facturo-guard` — the route-guard protocol.
//!
//! Guards gate the rendering of protected content. The decision itself is a
//! pure function over a session snapshot ([`decision::decide`]); the
//! framework-specific parts (how a session is resolved, how a redirect is
//! performed) enter through the [`SessionSource`] and [`Navigator`] traits.
//! Redirects are the only side effects in the whole authorization layer, and
//! they live here.

pub mod decision;
pub mod guard;
pub mod onboarding;

pub use decision::{GuardOutcome, GuardRequirement, LOGIN_ROUTE, SessionSnapshot, decide};
pub use guard::{GuardState, Navigator, RouteGuard, SessionSource};
pub use onboarding::{
    ONBOARDED_FALLBACK_ROUTE, ONBOARDING_ROUTE, OnboardingGate, OnboardingOutcome,
    OnboardingState, TenantSettingsSource, outcome_for,
};
