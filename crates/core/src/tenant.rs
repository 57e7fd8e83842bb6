//! Tenant slug value type.
//!
//! A slug is the URL-facing tenant handle (e.g. `acme-gmbh`), compared by
//! value and validated at construction.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// URL-safe tenant handle.
///
/// # Invariants
/// - 1..=63 characters.
/// - Lowercase ASCII letters, digits, and hyphens only.
/// - Never starts or ends with a hyphen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantSlug(String);

impl TenantSlug {
    pub fn new(raw: impl Into<String>) -> DomainResult<Self> {
        let raw = raw.into();

        if raw.is_empty() || raw.len() > 63 {
            return Err(DomainError::validation(
                "tenant slug must be 1..=63 characters",
            ));
        }
        if raw.starts_with('-') || raw.ends_with('-') {
            return Err(DomainError::validation(
                "tenant slug must not start or end with a hyphen",
            ));
        }
        if !raw
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        {
            return Err(DomainError::validation(
                "tenant slug must contain only lowercase letters, digits, and hyphens",
            ));
        }

        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for TenantSlug {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TenantSlug {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TenantSlug> for String {
    fn from(value: TenantSlug) -> Self {
        value.0
    }
}

impl core::str::FromStr for TenantSlug {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
