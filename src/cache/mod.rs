//! Cache module for storing API responses in a shared key/value store
//!
//! This module provides a `CacheStore` that namespaces keys, stamps every entry
//! with an expiry instant, and absorbs every storage fault so the cache can never
//! break its caller. Backends implement [`KeyValueStore`]; a durable
//! [`FileStore`] and an in-process [`MemoryStore`] are provided.

mod clock;
mod entry;
mod manager;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use manager::{CacheError, CacheStore, DEFAULT_TTL, NAMESPACE_PREFIX};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
