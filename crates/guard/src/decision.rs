//! The pure guard decision.
//!
//! Everything here is data-in/data-out: the redirect a denial calls for is
//! *returned*, never performed. [`crate::guard::RouteGuard`] owns performing
//! it, which keeps render paths free of navigation side effects.

use facturo_auth::{Role, landing_route};

/// Destination of the login interstitial.
pub const LOGIN_ROUTE: &str = "/login";

/// What a guard demands of the session before rendering its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardRequirement {
    /// Any authenticated session may enter. The tenant-area guard uses this;
    /// route-level role filtering is link visibility, not page denial.
    Authenticated,
    /// Exactly this role may enter. The platform-admin guard requires
    /// [`Role::SuperAdmin`]; any other role is turned away from the whole
    /// area.
    ExactRole(Role),
}

/// The session context as the guard sees it once resolution completes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    pub token: Option<String>,
    pub role: Option<Role>,
}

impl SessionSnapshot {
    /// No session at all (also what unavailable storage resolves to).
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(token: impl Into<String>, role: Role) -> Self {
        Self {
            token: Some(token.into()),
            role: Some(role),
        }
    }
}

/// What the guard does once decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Render the protected children.
    Render,
    /// Park `remember` as the redirect intent, then go to [`LOGIN_ROUTE`].
    RedirectToLogin { remember: String },
    /// Go to a role-appropriate fallback.
    RedirectTo { destination: String },
}

/// Decide a guard outcome for a resolved session.
///
/// The authentication check strictly precedes the role check: a snapshot
/// missing either half of the token/role pair resolves to the login
/// redirect, so an unauthenticated caller can never learn how the area is
/// role-gated from which redirect it got.
pub fn decide(
    requirement: GuardRequirement,
    snapshot: &SessionSnapshot,
    requested_path: &str,
) -> GuardOutcome {
    let (Some(_token), Some(role)) = (&snapshot.token, snapshot.role) else {
        return GuardOutcome::RedirectToLogin {
            remember: requested_path.to_string(),
        };
    };

    match requirement {
        GuardRequirement::Authenticated => GuardOutcome::Render,
        GuardRequirement::ExactRole(required) if role == required => GuardOutcome::Render,
        GuardRequirement::ExactRole(_) => GuardOutcome::RedirectTo {
            destination: landing_route(role).to_string(),
        },
    }
}
