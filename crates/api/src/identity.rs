//! Identity boundary.
//!
//! Sessions get their role from an identity provider record, never from
//! anything in the credential itself. The in-memory directory below stands
//! in for a real provider; the trait is the seam a real one plugs into.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use facturo_auth::Role;
use facturo_core::{TenantId, TenantSlug, UserId};

/// A resolved identity, as the provider asserts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
    /// Present for every role except `SUPER_ADMIN`, whose operations are
    /// tenant-agnostic.
    pub tenant: Option<(TenantId, TenantSlug)>,
}

/// Tenant signup request, validated before it reaches the provider.
#[derive(Debug, Clone)]
pub struct TenantRegistration {
    pub email: String,
    pub password: String,
    pub slug: TenantSlug,
}

/// Platform-oversight view of a tenant.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TenantSummary {
    pub id: TenantId,
    pub slug: TenantSlug,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("email already registered")]
    EmailTaken,
    #[error("tenant slug already taken")]
    SlugTaken,
}

/// Authoritative source of who a credential belongs to.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Authenticate a known user. `None` covers unknown email and wrong
    /// password alike; callers cannot distinguish the two.
    async fn authenticate(&self, email: &str, password: &str) -> Option<Identity>;

    /// Provision a tenant and its owning `TENANT_ADMIN` account.
    async fn register_tenant(
        &self,
        registration: TenantRegistration,
    ) -> Result<Identity, RegistrationError>;

    /// Platform oversight: all known tenants.
    async fn tenants(&self) -> Vec<TenantSummary>;
}

/// Mint an opaque access token for a fresh session.
///
/// The token is a simulated credential: the session layer treats it as an
/// opaque string, and nothing downstream decodes it.
pub fn mint_access_token() -> String {
    format!("fct_{}", Uuid::now_v7().simple())
}

#[derive(Debug, Clone)]
struct UserRecord {
    user_id: UserId,
    password: String,
    role: Role,
    tenant: Option<(TenantId, TenantSlug)>,
}

#[derive(Debug, Default)]
struct DirectoryInner {
    users: HashMap<String, UserRecord>,
    tenants: Vec<TenantSummary>,
}

/// In-memory directory with demo data.
#[derive(Debug, Default)]
pub struct MockDirectory {
    inner: Mutex<DirectoryInner>,
}

/// Password shared by the demo accounts.
pub const DEMO_PASSWORD: &str = "demo";

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory seeded with one demo tenant (`acme`) and one account per
    /// role.
    pub fn with_demo_data() -> Self {
        let directory = Self::new();
        let acme = TenantId::new();
        let slug = TenantSlug::new("acme").expect("demo slug is well-formed");

        {
            let mut inner = directory
                .inner
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            inner.tenants.push(TenantSummary {
                id: acme,
                slug: slug.clone(),
            });

            let mut seed = |email: &str, role: Role, tenant: Option<(TenantId, TenantSlug)>| {
                inner.users.insert(
                    email.to_string(),
                    UserRecord {
                        user_id: UserId::new(),
                        password: DEMO_PASSWORD.to_string(),
                        role,
                        tenant,
                    },
                );
            };

            seed("admin@facturo.dev", Role::SuperAdmin, None);
            seed("owner@acme.test", Role::TenantAdmin, Some((acme, slug.clone())));
            seed("books@acme.test", Role::Accountant, Some((acme, slug.clone())));
            seed("viewer@acme.test", Role::Viewer, Some((acme, slug)));
        }

        directory
    }
}

#[async_trait]
impl IdentityProvider for MockDirectory {
    async fn authenticate(&self, email: &str, password: &str) -> Option<Identity> {
        let inner = self.inner.lock().ok()?;
        let record = inner.users.get(email)?;
        if record.password != password {
            return None;
        }
        Some(Identity {
            user_id: record.user_id,
            email: email.to_string(),
            role: record.role,
            tenant: record.tenant.clone(),
        })
    }

    async fn register_tenant(
        &self,
        registration: TenantRegistration,
    ) -> Result<Identity, RegistrationError> {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        if inner.users.contains_key(&registration.email) {
            return Err(RegistrationError::EmailTaken);
        }
        if inner.tenants.iter().any(|t| t.slug == registration.slug) {
            return Err(RegistrationError::SlugTaken);
        }

        let tenant_id = TenantId::new();
        inner.tenants.push(TenantSummary {
            id: tenant_id,
            slug: registration.slug.clone(),
        });

        let record = UserRecord {
            user_id: UserId::new(),
            password: registration.password,
            role: Role::TenantAdmin,
            tenant: Some((tenant_id, registration.slug)),
        };
        let identity = Identity {
            user_id: record.user_id,
            email: registration.email.clone(),
            role: record.role,
            tenant: record.tenant.clone(),
        };
        inner.users.insert(registration.email, record);

        Ok(identity)
    }

    async fn tenants(&self) -> Vec<TenantSummary> {
        self.inner
            .lock()
            .map(|inner| inner.tenants.clone())
            .unwrap_or_default()
    }
}
