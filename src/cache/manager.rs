//! Namespaced, time-boxed cache over a shared key/value store
//!
//! Provides a `CacheStore` that wraps any [`KeyValueStore`] with a key prefix,
//! expiry metadata and fault containment: no public operation ever fails. Each
//! operation is implemented once as a `Result`-returning private method, and the
//! public wrapper logs the error and falls back to `None`, `false` or a no-op.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use super::clock::{Clock, SystemClock};
use super::entry::CacheEntry;
use super::store::{KeyValueStore, StoreError};

/// Prefix prepended to every logical key before it reaches the store
pub const NAMESPACE_PREFIX: &str = "podcaster:";

/// Time-to-live applied by [`CacheStore::set`]
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Failures inside the cache, never surfaced by the public API
#[derive(Debug, Error)]
pub enum CacheError {
    /// The underlying store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An entry or payload could not be (de)serialized
    #[error("cache serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Best-effort cache of JSON-serializable values
///
/// Expiry is enforced lazily: an entry read at or after its `expiresAt` is
/// deleted and reported as absent. Entries that parse as JSON but are not cache
/// entries are deleted the same way.
#[derive(Clone)]
pub struct CacheStore {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("namespace", &NAMESPACE_PREFIX)
            .finish_non_exhaustive()
    }
}

impl CacheStore {
    /// Creates a cache over `store` using the wall clock
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Creates a cache over `store` using a custom time source
    pub fn with_clock(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Returns the storage key for a logical key
    fn namespaced(key: &str) -> String {
        format!("{}{}", NAMESPACE_PREFIX, key)
    }

    /// Returns the cached value for `key`, or `None` if absent, expired,
    /// malformed, of a different type, or if the store failed
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_get(key) {
            Ok(data) => data,
            Err(e) => {
                warn!(key, error = %e, "Cache read failed");
                None
            }
        }
    }

    /// Caches `data` under `key` for [`DEFAULT_TTL`]
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, data: &T) {
        self.set_with_ttl(key, data, DEFAULT_TTL);
    }

    /// Caches `data` under `key` for `ttl`
    ///
    /// A zero TTL writes an entry that is already expired.
    pub fn set_with_ttl<T: Serialize + ?Sized>(&self, key: &str, data: &T, ttl: Duration) {
        if let Err(e) = self.try_set(key, data, ttl) {
            warn!(key, error = %e, "Cache write failed");
        }
    }

    /// Deletes the entry for `key`
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.store.remove_item(&Self::namespaced(key)) {
            warn!(key, error = %e, "Cache remove failed");
        }
    }

    /// Whether `get(key)` would currently find a value
    ///
    /// Applies the same expiry and structure checks as `get`, including
    /// deleting stale entries.
    pub fn has(&self, key: &str) -> bool {
        match self.lookup(key) {
            Ok(data) => data.is_some(),
            Err(e) => {
                warn!(key, error = %e, "Cache lookup failed");
                false
            }
        }
    }

    /// Deletes every entry in this cache's namespace, leaving other keys alone
    pub fn clear(&self) {
        match self.try_clear() {
            Ok(removed) => debug!(removed, "Cache cleared"),
            Err(e) => warn!(error = %e, "Cache clear failed"),
        }
    }

    fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.lookup(key)? {
            Some(data) => Ok(Some(serde_json::from_value(data)?)),
            None => Ok(None),
        }
    }

    /// Reads and validates the entry for `key`, deleting it if it is stale
    fn lookup(&self, key: &str) -> Result<Option<Value>, CacheError> {
        let storage_key = Self::namespaced(key);
        let Some(text) = self.store.get_item(&storage_key)? else {
            return Ok(None);
        };

        let raw: Value = serde_json::from_str(&text)?;
        if let Ok(entry) = serde_json::from_value::<CacheEntry>(raw) {
            if entry.is_valid_at(self.clock.now_millis()) {
                return Ok(Some(entry.data));
            }
        }

        debug!(key, "Removing expired or invalid cache entry");
        self.store.remove_item(&storage_key)?;
        Ok(None)
    }

    fn try_set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        data: &T,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let ttl_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let entry = CacheEntry::new(serde_json::to_value(data)?, self.clock.now_millis(), ttl_millis);
        let text = serde_json::to_string(&entry)?;
        self.store.set_item(&Self::namespaced(key), &text)?;
        Ok(())
    }

    /// Removes namespaced keys, continuing past individual failures
    ///
    /// Returns how many keys were removed, or the first removal error once
    /// every key has been attempted.
    fn try_clear(&self) -> Result<usize, CacheError> {
        let mut removed = 0;
        let mut first_error = None;

        for key in self.store.keys()? {
            if !key.starts_with(NAMESPACE_PREFIX) {
                continue;
            }
            match self.store.remove_item(&key) {
                Ok(()) => removed += 1,
                Err(e) => {
                    warn!(key = %key, error = %e, "Failed to remove cache entry");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(removed),
        }
    }
}
