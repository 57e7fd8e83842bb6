//! Static permission matrix.
//!
//! The matrix maps (area, route) to the set of roles permitted there. It is
//! compiled in: changing an entry means redeploying, which keeps the
//! authorization surface auditable and immune to privilege escalation via a
//! data bug. A route absent from the matrix is accessible to nobody.

use crate::{Area, Role};

/// Declared routes of the tenant workspace, in navigation order.
pub const SYSTEM_ROUTES: &[&str] = &[
    "dashboard",
    "invoices",
    "quotes",
    "customers",
    "products",
    "payments",
    "reminders",
    "billing",
    "settings",
    "onboarding",
];

/// Declared routes of the platform-admin area, in navigation order.
pub const PLATFORM_ADMIN_ROUTES: &[&str] = &["dashboard", "tenants", "plans"];

/// Roles permitted on a route.
///
/// Unknown routes resolve to the empty set. Absence is data, not an error:
/// this function is total so callers can use it from render paths without
/// error handling.
pub fn permitted_roles(area: Area, route: &str) -> &'static [Role] {
    use Role::{Accountant, SuperAdmin, TenantAdmin, Viewer};

    match area {
        Area::System => match route {
            "dashboard" | "invoices" | "quotes" | "customers" => {
                &[TenantAdmin, Accountant, Viewer]
            }
            "products" | "payments" | "reminders" => &[TenantAdmin, Accountant],
            "billing" | "settings" | "onboarding" => &[TenantAdmin],
            _ => &[],
        },
        Area::PlatformAdmin => match route {
            "dashboard" | "tenants" | "plans" => &[SuperAdmin],
            _ => &[],
        },
    }
}

/// Routes of an area, for navigation builders and exhaustive tests.
pub fn declared_routes(area: Area) -> &'static [&'static str] {
    match area {
        Area::System => SYSTEM_ROUTES,
        Area::PlatformAdmin => PLATFORM_ADMIN_ROUTES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_declared_route_has_an_entry() {
        for area in Area::ALL {
            for route in declared_routes(area) {
                assert!(
                    !permitted_roles(area, route).is_empty(),
                    "{area}/{route} grants nobody access"
                );
            }
        }
    }

    #[test]
    fn undeclared_routes_grant_nobody_access() {
        for area in Area::ALL {
            assert!(permitted_roles(area, "reports").is_empty());
            assert!(permitted_roles(area, "").is_empty());
        }
    }

    #[test]
    fn platform_routes_are_super_admin_only() {
        for route in PLATFORM_ADMIN_ROUTES {
            assert_eq!(
                permitted_roles(Area::PlatformAdmin, route),
                &[Role::SuperAdmin][..]
            );
        }
    }

    #[test]
    fn super_admin_holds_no_tenant_routes() {
        for route in SYSTEM_ROUTES {
            assert!(
                !permitted_roles(Area::System, route).contains(&Role::SuperAdmin),
                "system/{route} unexpectedly grants SUPER_ADMIN"
            );
        }
    }
}
