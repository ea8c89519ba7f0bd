//! Time-to-live cache over a pluggable string store.
//!
//! Entries are stored as a JSON object holding the cached value's fields plus
//! a `checkedAt` epoch-millisecond stamp. Expired and unreadable entries are
//! evicted on read and reported as a miss.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{
    cell::RefCell, collections::HashMap, fmt, marker::PhantomData, rc::Rc, time::Duration,
};
use thiserror::Error;
use tracing::{debug, warn};
use wasm_bindgen::JsValue;

/// Failures reported by a [`CacheStore`] backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("stored value is corrupt: {0}")]
    Corrupt(String),
    #[error("storage backend failed: {0}")]
    Backend(String),
}

/// Key/value string storage backing a [`TtlCache`].
pub trait CacheStore {
    /// Read the raw value under `key`.
    ///
    /// # Errors
    /// Returns an error if the backend cannot produce the value.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value under `key`.
    ///
    /// # Errors
    /// Returns an error if the backend rejects the write.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str);
}

impl<S: CacheStore + ?Sized> CacheStore for Rc<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key);
    }
}

/// Process-local store, used in tests and when no browser storage exists.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl CacheStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Tab-scoped `sessionStorage`. Values do not survive a browser restart and
/// are not shared between tabs.
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionStorageStore;

impl SessionStorageStore {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .ok_or_else(|| StorageError::Backend("no window".to_string()))?
            .session_storage()
            .map_err(backend_error)?
            .ok_or_else(|| StorageError::Backend("sessionStorage is unavailable".to_string()))
    }
}

fn backend_error(err: JsValue) -> StorageError {
    StorageError::Backend(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

impl CacheStore for SessionStorageStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?.get_item(key).map_err(backend_error)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?.set_item(key, value).map_err(backend_error)
    }

    fn remove(&self, key: &str) {
        let removed =
            Self::storage().and_then(|storage| storage.remove_item(key).map_err(backend_error));
        if let Err(err) = removed {
            debug!(key, error = %err, "could not remove cache entry");
        }
    }
}

#[derive(Serialize)]
struct OutgoingEntry<'a, T> {
    #[serde(flatten)]
    value: &'a T,
    #[serde(rename = "checkedAt")]
    checked_at: i64,
}

#[derive(Deserialize)]
struct StoredEntry<T> {
    #[serde(flatten)]
    value: T,
    #[serde(rename = "checkedAt")]
    checked_at: i64,
}

/// A single cached value with a freshness window.
pub struct TtlCache<T, S> {
    store: S,
    key: String,
    ttl_ms: i64,
    _value: PhantomData<fn() -> T>,
}

impl<T, S: fmt::Debug> fmt::Debug for TtlCache<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("store", &self.store)
            .field("key", &self.key)
            .field("ttl_ms", &self.ttl_ms)
            .finish()
    }
}

impl<T, S> TtlCache<T, S>
where
    T: Serialize + DeserializeOwned,
    S: CacheStore,
{
    pub fn new(store: S, key: impl Into<String>, ttl: Duration) -> Self {
        Self {
            store,
            key: key.into(),
            ttl_ms: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
            _value: PhantomData,
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Fresh value, if any. Stale or unreadable entries are evicted.
    pub fn get(&self, now_ms: i64) -> Option<T> {
        let raw = match self.store.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(key = %self.key, error = %err, "evicting unreadable cache entry");
                self.store.remove(&self.key);
                return None;
            }
        };

        let entry = match serde_json::from_str::<StoredEntry<T>>(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(key = %self.key, error = %err, "evicting corrupt cache entry");
                self.store.remove(&self.key);
                return None;
            }
        };

        let age = now_ms.saturating_sub(entry.checked_at);
        if (0..self.ttl_ms).contains(&age) {
            Some(entry.value)
        } else {
            debug!(key = %self.key, age_ms = age, "cache entry expired");
            self.store.remove(&self.key);
            None
        }
    }

    /// Store `value` as checked at `now_ms`. Last write wins.
    pub fn put(&self, value: &T, now_ms: i64) {
        let entry = OutgoingEntry {
            value,
            checked_at: now_ms,
        };
        let encoded = match serde_json::to_string(&entry) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!(key = %self.key, error = %err, "cache value is not serializable");
                return;
            }
        };
        if let Err(err) = self.store.write(&self.key, &encoded) {
            warn!(key = %self.key, error = %err, "failed to write cache entry");
        }
    }

    pub fn invalidate(&self) {
        self.store.remove(&self.key);
    }
}
