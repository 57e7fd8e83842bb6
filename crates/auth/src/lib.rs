//! `facturo-auth` — pure authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP, storage, and rendering.
//! Every access decision funnels through [`engine::can_access`], a static
//! table lookup with no I/O, so the full (area × route × role) cross product
//! is unit testable and a security audit has exactly one code path to review.

pub mod area;
pub mod engine;
pub mod matrix;
pub mod role;

pub use area::{Area, AreaParseError};
pub use engine::{can_access, landing_route};
pub use matrix::{PLATFORM_ADMIN_ROUTES, SYSTEM_ROUTES, declared_routes, permitted_roles};
pub use role::{Role, RoleParseError};
