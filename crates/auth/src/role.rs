//! Closed role vocabulary.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role of an authenticated session.
///
/// The vocabulary is closed on purpose: exactly one role is active per
/// session, assigned at login and never re-derived mid-session. Keeping the
/// set small and fully enumerable is what makes the permission matrix
/// auditable; resist generalizing this into dynamic permission strings.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Platform operator. Cross-tenant; carries no tenant context.
    SuperAdmin,
    /// Tenant owner with full control of one workspace.
    TenantAdmin,
    /// Bookkeeping staff; operates documents, payments, and reminders.
    Accountant,
    /// Read-only access to tenant documents.
    Viewer,
}

/// An externally-supplied role string did not name a known role.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct RoleParseError(pub String);

impl Role {
    /// Every role, in privilege order. Used to validate external input and
    /// to enumerate the matrix in tests.
    pub const ALL: [Role; 4] = [
        Role::SuperAdmin,
        Role::TenantAdmin,
        Role::Accountant,
        Role::Viewer,
    ];

    /// Canonical wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::TenantAdmin => "TENANT_ADMIN",
            Role::Accountant => "ACCOUNTANT",
            Role::Viewer => "VIEWER",
        }
    }

    /// Whether this role operates the platform rather than a tenant.
    ///
    /// Platform roles never carry tenant context in their session.
    pub fn is_platform(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| RoleParseError(s.to_string()))
    }
}
