//! Serialized form of a cache entry
//!
//! Entries are stored as JSON text of the shape
//! `{"data": <payload>, "timestamp": <ms>, "expiresAt": <ms>}`. Text that is
//! valid JSON but not of this shape is structurally invalid.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wrapper stored under each namespaced key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// The cached payload, opaque to the cache
    pub data: Value,
    /// When the entry was written (ms since epoch)
    pub timestamp: i64,
    /// When the entry stops being valid (ms since epoch)
    ///
    /// Entries written by other software may lack this field; those are
    /// never valid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl CacheEntry {
    /// Builds an entry written at `now` that lives for `ttl_millis`
    pub fn new(data: Value, now: i64, ttl_millis: i64) -> Self {
        Self {
            data,
            timestamp: now,
            expires_at: Some(now.saturating_add(ttl_millis)),
        }
    }

    /// Whether the entry may still be served at `now`
    ///
    /// The comparison is strict: an entry expiring exactly at `now` is expired.
    pub fn is_valid_at(&self, now: i64) -> bool {
        matches!(self.expires_at, Some(expires_at) if expires_at > now)
    }
}
