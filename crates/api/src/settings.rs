//! Tenant settings service (external collaborator, stubbed in memory).
//!
//! The onboarding gate only ever asks one question of this service; how a
//! real deployment fetches or caches settings is invisible to it.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use facturo_core::TenantId;
use facturo_guard::TenantSettingsSource;

/// Per-tenant settings. Tenants absent from the map have not completed
/// onboarding.
#[derive(Debug, Default)]
pub struct TenantSettingsService {
    completed: Mutex<HashMap<TenantId, bool>>,
}

impl TenantSettingsService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_completed(&self, tenant: TenantId) -> bool {
        self.completed
            .lock()
            .map(|map| map.get(&tenant).copied().unwrap_or(false))
            .unwrap_or(false)
    }

    pub fn mark_completed(&self, tenant: TenantId) {
        if let Ok(mut map) = self.completed.lock() {
            map.insert(tenant, true);
        }
    }
}

/// The settings view for one tenant, as the gate consumes it.
pub struct SettingsFor<'a> {
    pub service: &'a TenantSettingsService,
    pub tenant: TenantId,
}

#[async_trait]
impl TenantSettingsSource for SettingsFor<'_> {
    async fn onboarding_completed(&self) -> Option<bool> {
        Some(self.service.is_completed(self.tenant))
    }
}
