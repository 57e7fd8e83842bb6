//! The session store.
//!
//! Holds the session context (access token, role, tenant id/slug) as
//! expiring entries in a [`StorageBackend`]. Token and role are written and
//! cleared as a pair through single call sites, so no caller can ever
//! observe one without the other.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use facturo_auth::Role;
use facturo_core::{TenantId, TenantSlug};

use crate::backend::{EntryAttributes, SameSite, StorageBackend};

/// Lifetime of session-context entries, stamped at write.
pub fn session_ttl() -> Duration {
    Duration::days(7)
}

pub(crate) const TOKEN_KEY: &str = "facturo_access_token";
pub(crate) const ROLE_KEY: &str = "facturo_user_role";
pub(crate) const TENANT_ID_KEY: &str = "facturo_tenant_id";
pub(crate) const TENANT_SLUG_KEY: &str = "facturo_tenant_slug";
pub(crate) const INTENT_KEY: &str = "facturo_redirect_intent";

/// A stored entry: the value plus its expiry, stamped at write time.
///
/// Expiry is enforced at read; there is no refresh-on-read. Cookie-shaped
/// backends additionally receive the lifetime as `Max-Age`, but the record
/// keeps its own stamp so expiry holds on media without one.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SessionRecord {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

/// Durable client-scoped storage of the session context.
pub struct SessionStore<B> {
    backend: B,
    secure: bool,
}

impl<B: StorageBackend> SessionStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            secure: true,
        }
    }

    /// Drop the secure-transport attribute. Plain-HTTP local development
    /// only; the entries still carry `SameSite` and expiry.
    pub fn without_transport_security(backend: B) -> Self {
        Self {
            backend,
            secure: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // ── Session pair (token + role) ─────────────────────────────────────────

    /// Write token and role together. This is the only write path for either
    /// entry; login and signup both go through here.
    pub fn set_session(&self, token: &str, role: Role) {
        self.set_session_at(token, role, Utc::now());
    }

    pub fn set_session_at(&self, token: &str, role: Role, now: DateTime<Utc>) {
        self.write(TOKEN_KEY, token, now, session_ttl());
        self.write(ROLE_KEY, role.as_str(), now, session_ttl());
        tracing::debug!(role = %role, "session written");
    }

    pub fn get_token(&self) -> Option<String> {
        self.get_token_at(Utc::now())
    }

    pub fn get_token_at(&self, now: DateTime<Utc>) -> Option<String> {
        self.read(TOKEN_KEY, now)
    }

    pub fn get_role(&self) -> Option<Role> {
        self.get_role_at(Utc::now())
    }

    /// A stored value that no longer parses as a role reads as no role at
    /// all (fail closed).
    pub fn get_role_at(&self, now: DateTime<Utc>) -> Option<Role> {
        self.read(ROLE_KEY, now)?.parse().ok()
    }

    /// Drop token and role together.
    pub fn clear_session(&self) {
        self.backend.remove(TOKEN_KEY);
        self.backend.remove(ROLE_KEY);
        tracing::debug!("session cleared");
    }

    // ── Tenant pair (id + slug) ─────────────────────────────────────────────

    /// Write tenant id and slug together. Called at login for every
    /// non-platform role; platform sessions carry no tenant context.
    pub fn set_tenant(&self, id: TenantId, slug: &TenantSlug) {
        self.set_tenant_at(id, slug, Utc::now());
    }

    pub fn set_tenant_at(&self, id: TenantId, slug: &TenantSlug, now: DateTime<Utc>) {
        self.write(TENANT_ID_KEY, &id.to_string(), now, session_ttl());
        self.write(TENANT_SLUG_KEY, slug.as_str(), now, session_ttl());
    }

    pub fn get_tenant(&self) -> Option<(TenantId, TenantSlug)> {
        self.get_tenant_at(Utc::now())
    }

    /// Both halves must be present and well-formed; anything less reads as
    /// no tenant context.
    pub fn get_tenant_at(&self, now: DateTime<Utc>) -> Option<(TenantId, TenantSlug)> {
        let id = self.read(TENANT_ID_KEY, now)?.parse().ok()?;
        let slug = self.read(TENANT_SLUG_KEY, now)?.parse().ok()?;
        Some((id, slug))
    }

    pub fn clear_tenant(&self) {
        self.backend.remove(TENANT_ID_KEY);
        self.backend.remove(TENANT_SLUG_KEY);
    }

    /// Logout: every entry drops together, the redirect intent included.
    pub fn clear_all(&self) {
        self.clear_session();
        self.clear_tenant();
        self.backend.remove(INTENT_KEY);
    }

    // ── Record plumbing ─────────────────────────────────────────────────────

    pub(crate) fn write(&self, key: &str, value: &str, now: DateTime<Utc>, ttl: Duration) {
        let record = SessionRecord {
            value: value.to_string(),
            expires_at: now + ttl,
        };
        let Ok(serialized) = serde_json::to_string(&record) else {
            // String + timestamp cannot fail to serialize; drop rather than panic.
            return;
        };
        self.backend.set(
            key,
            serialized,
            EntryAttributes {
                max_age: ttl,
                secure: self.secure,
                same_site: SameSite::Lax,
            },
        );
    }

    /// Absent, expired, and unreadable entries are all `None`.
    pub(crate) fn read(&self, key: &str, now: DateTime<Utc>) -> Option<String> {
        let raw = self.backend.get(key)?;
        let record: SessionRecord = serde_json::from_str(&raw).ok()?;
        if record.expires_at <= now {
            return None;
        }
        Some(record.value)
    }
}
