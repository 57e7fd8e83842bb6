//! Storage medium abstraction.
//!
//! The session store does not know whether it writes browser cookies, an
//! in-memory map, or nothing at all. Backends expose string entries plus the
//! transport attributes a cookie-shaped medium needs; media without those
//! concepts ignore the attributes.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Duration;

/// Same-site restriction for cookie-shaped backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
}

/// Attributes attached to a stored entry at write time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryAttributes {
    /// Entry lifetime from the moment of the write.
    pub max_age: Duration,
    /// Never transmit over plain HTTP.
    pub secure: bool,
    /// Same-site restriction.
    pub same_site: SameSite,
}

/// A keyed string store.
///
/// Implementations use interior mutability; the store only ever holds `&self`.
/// `get` on an unavailable medium returns `None`, and writes to one are
/// silently dropped: callers treat "no storage" identically to "no session".
pub trait StorageBackend {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String, attrs: EntryAttributes);
    fn remove(&self, key: &str);
}

impl<B: StorageBackend + ?Sized> StorageBackend for std::sync::Arc<B> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String, attrs: EntryAttributes) {
        (**self).set(key, value, attrs)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}

/// In-memory backend for tests and single-process embedding.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    // A poisoned map degrades to "unavailable" rather than panicking.
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: String, _attrs: EntryAttributes) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value);
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

/// Backend for execution contexts with no storage medium at all
/// (e.g. server-side rendering with no request cookies).
///
/// Reads are always absent; writes vanish.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStorage;

impl StorageBackend for UnavailableStorage {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: String, _attrs: EntryAttributes) {}

    fn remove(&self, _key: &str) {}
}
