//! Protected-surface partitions.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level partition of the protected application surface.
///
/// Fixed at build time. A string that names no area fails to parse; there
/// is no catch-all partition.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Area {
    /// Tenant workspace: invoicing, customers, settings for one tenant.
    System,
    /// Cross-tenant platform administration.
    PlatformAdmin,
}

/// An externally-supplied area string did not name a known area.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown area: {0}")]
pub struct AreaParseError(pub String);

impl Area {
    pub const ALL: [Area; 2] = [Area::System, Area::PlatformAdmin];

    /// Canonical wire name, also the URL path prefix of the area.
    pub fn as_str(&self) -> &'static str {
        match self {
            Area::System => "system",
            Area::PlatformAdmin => "platform-admin",
        }
    }
}

impl core::fmt::Display for Area {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Area {
    type Err = AreaParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Area::ALL
            .into_iter()
            .find(|area| area.as_str() == s)
            .ok_or_else(|| AreaParseError(s.to_string()))
    }
}
