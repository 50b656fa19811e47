//! Podcast directory data access
//!
//! Read-through access to the iTunes podcast endpoints: look in the cache first,
//! fetch through the proxy chain on a miss, then cache what came back. Payloads
//! are kept as raw JSON values and handed to the caller unchanged.

use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::form_urlencoded;

use crate::cache::{CacheStore, DEFAULT_TTL};
use crate::fetcher::{ApiError, ResilientFetcher};

/// Base URL for the iTunes endpoints
const ITUNES_BASE_URL: &str = "https://itunes.apple.com";

/// Cache key for the top podcasts list
pub const TOP_PODCASTS_KEY: &str = "podcasts-list";

/// Number of podcasts in the top list
const TOP_PODCASTS_LIMIT: u32 = 100;

/// iTunes genre id for music podcasts
const MUSIC_GENRE_ID: u32 = 1310;

/// Number of episodes requested per podcast
const EPISODE_LIMIT: u32 = 20;

/// Podcast directory backed by a cache and a resilient fetcher
#[derive(Debug, Clone)]
pub struct PodcastDirectory {
    cache: CacheStore,
    fetcher: ResilientFetcher,
    ttl: Duration,
    base_url: String,
}

impl PodcastDirectory {
    /// Creates a directory against the public iTunes API
    pub fn new(cache: CacheStore, fetcher: ResilientFetcher) -> Self {
        Self {
            cache,
            fetcher,
            ttl: DEFAULT_TTL,
            base_url: ITUNES_BASE_URL.to_string(),
        }
    }

    /// Sets how long fetched responses stay cached
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Points the directory at another host (for testing)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Cache key for a single podcast's details
    pub fn podcast_key(id: &str) -> String {
        format!("podcast-{}", id)
    }

    fn top_podcasts_url(&self) -> String {
        format!(
            "{}/us/rss/toppodcasts/limit={}/genre={}/json",
            self.base_url, TOP_PODCASTS_LIMIT, MUSIC_GENRE_ID
        )
    }

    fn podcast_url(&self, id: &str) -> String {
        let id: String = form_urlencoded::byte_serialize(id.as_bytes()).collect();
        format!(
            "{}/lookup?id={}&media=podcast&entity=podcastEpisode&limit={}",
            self.base_url, id, EPISODE_LIMIT
        )
    }

    /// Fetches the top podcasts feed
    pub async fn top_podcasts(&self) -> Result<Value, ApiError> {
        self.fetch_cached(TOP_PODCASTS_KEY, &self.top_podcasts_url())
            .await
    }

    /// Fetches a podcast and its most recent episodes
    pub async fn podcast_detail(&self, id: &str) -> Result<Value, ApiError> {
        self.fetch_cached(&Self::podcast_key(id), &self.podcast_url(id))
            .await
    }

    /// Returns the cached value for `key`, or fetches `url` and caches it
    ///
    /// # Behavior
    /// - A fresh cache entry is returned without touching the network
    /// - On a miss the URL is fetched through the full route chain
    /// - Only successful responses are cached
    pub async fn fetch_cached(&self, key: &str, url: &str) -> Result<Value, ApiError> {
        if let Some(cached) = self.cache.get::<Value>(key) {
            debug!(key, "Serving from cache");
            return Ok(cached);
        }

        let value: Value = self.fetcher.get(url).await?;
        self.cache.set_with_ttl(key, &value, self.ttl);
        Ok(value)
    }
}
