//! Pure access decisions.
//!
//! [`can_access`] is the single decision path for the whole application.
//! Navigation builders, guards, and handlers all call it; nothing else
//! consults the matrix directly.

use crate::{Area, Role, matrix};

/// Decide whether `role` may access `route` within `area`.
///
/// - No I/O
/// - No panics
/// - No session resolution (a missing session is `None`)
///
/// `None` is always denied. A route without a matrix entry is denied for
/// every role. Unknown inputs are data, not error conditions, which keeps
/// this function total and callable from render paths without `match` arms
/// for failure.
pub fn can_access(area: Area, route: &str, role: Option<Role>) -> bool {
    let Some(role) = role else {
        return false;
    };

    matrix::permitted_roles(area, route).contains(&role)
}

/// Role-appropriate landing destination after login (and the fallback a
/// wrongly-roled guard redirects to).
pub fn landing_route(role: Role) -> &'static str {
    if role.is_platform() {
        "/platform-admin/dashboard"
    } else {
        "/system/dashboard"
    }
}

// Derived capability predicates.
//
// These add naming only. Each is a single `can_access` call against a fixed
// (area, route) pair; no predicate introduces authorization logic of its
// own.

pub fn can_view_invoices(role: Option<Role>) -> bool {
    can_access(Area::System, "invoices", role)
}

pub fn can_record_payments(role: Option<Role>) -> bool {
    can_access(Area::System, "payments", role)
}

pub fn can_manage_products(role: Option<Role>) -> bool {
    can_access(Area::System, "products", role)
}

pub fn can_send_reminders(role: Option<Role>) -> bool {
    can_access(Area::System, "reminders", role)
}

pub fn can_manage_billing(role: Option<Role>) -> bool {
    can_access(Area::System, "billing", role)
}

pub fn can_manage_settings(role: Option<Role>) -> bool {
    can_access(Area::System, "settings", role)
}

pub fn can_manage_tenants(role: Option<Role>) -> bool {
    can_access(Area::PlatformAdmin, "tenants", role)
}

pub fn can_manage_plans(role: Option<Role>) -> bool {
    can_access(Area::PlatformAdmin, "plans", role)
}
