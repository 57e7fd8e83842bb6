//! Redirect intent: the remembered original destination.
//!
//! When an unauthenticated visit to a protected path bounces to login, the
//! attempted pathname is parked here and consumed exactly once after the
//! user authenticates. The intent is not part of the session context: it is
//! a short-lived slot beside it, and `clear_all` drops it with everything
//! else.

use chrono::{DateTime, Duration, Utc};

use crate::backend::StorageBackend;
use crate::store::{INTENT_KEY, SessionStore};

/// Lifetime of a parked destination. Long enough to complete a login, short
/// enough that a stale intent cannot teleport the user days later.
pub fn intent_ttl() -> Duration {
    Duration::minutes(10)
}

impl<B: StorageBackend> SessionStore<B> {
    /// Park the pathname the user was denied, to return there after login.
    pub fn remember_intent(&self, path: &str) {
        self.remember_intent_at(path, Utc::now());
    }

    pub fn remember_intent_at(&self, path: &str, now: DateTime<Utc>) {
        self.write(INTENT_KEY, path, now, intent_ttl());
    }

    /// Consume the parked destination. The entry is removed on take whether
    /// or not it was still live, so a second take always returns `None`.
    pub fn take_intent(&self) -> Option<String> {
        self.take_intent_at(Utc::now())
    }

    pub fn take_intent_at(&self, now: DateTime<Utc>) -> Option<String> {
        let value = self.read(INTENT_KEY, now);
        self.backend().remove(INTENT_KEY);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStorage;

    fn frozen_now() -> DateTime<Utc> {
        "2026-03-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn intent_is_consumed_exactly_once() {
        let store = SessionStore::new(MemoryStorage::new());
        let now = frozen_now();

        store.remember_intent_at("/system/invoices", now);

        assert_eq!(
            store.take_intent_at(now).as_deref(),
            Some("/system/invoices")
        );
        assert_eq!(store.take_intent_at(now), None);
    }

    #[test]
    fn later_intent_overwrites_earlier() {
        let store = SessionStore::new(MemoryStorage::new());
        let now = frozen_now();

        store.remember_intent_at("/system/invoices", now);
        store.remember_intent_at("/system/customers", now);

        assert_eq!(
            store.take_intent_at(now).as_deref(),
            Some("/system/customers")
        );
    }

    #[test]
    fn stale_intent_is_not_returned() {
        let store = SessionStore::new(MemoryStorage::new());
        let parked = frozen_now();

        store.remember_intent_at("/system/invoices", parked);

        let much_later = parked + intent_ttl() + Duration::seconds(1);
        assert_eq!(store.take_intent_at(much_later), None);
        // The slot is cleared even when the value had gone stale.
        assert_eq!(store.take_intent_at(parked), None);
    }

    #[test]
    fn intent_survives_until_ttl_boundary() {
        let store = SessionStore::new(MemoryStorage::new());
        let parked = frozen_now();

        store.remember_intent_at("/system/reminders", parked);

        let just_before = parked + intent_ttl() - Duration::seconds(1);
        assert_eq!(
            store.take_intent_at(just_before).as_deref(),
            Some("/system/reminders")
        );
    }
}
