//! Runtime configuration derived from CLI arguments

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::cache::{CacheStore, FileStore, KeyValueStore, MemoryStore, DEFAULT_TTL};
use crate::cli::{parse_ttl_hours, Cli, CliError};
use crate::fetcher::{ProxyRoute, ResilientFetcher, DEFAULT_PROXIES};

/// Settings used to build the cache and the fetcher
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for cached responses; `None` selects the XDG cache directory
    pub cache_dir: Option<PathBuf>,
    /// How long fetched responses stay cached
    pub ttl: Duration,
    /// Proxy routes tried after the direct request
    pub proxies: Vec<ProxyRoute>,
    /// Whether debug logging is enabled
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: None,
            ttl: DEFAULT_TTL,
            proxies: DEFAULT_PROXIES.to_vec(),
            verbose: false,
        }
    }
}

impl Config {
    /// Creates a Config from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(Config)` with CLI values applied over the defaults
    /// * `Err(CliError)` if an argument value is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let ttl = match &cli.ttl_hours {
            Some(hours) => parse_ttl_hours(hours)?,
            None => DEFAULT_TTL,
        };

        Ok(Self {
            cache_dir: cli.cache_dir.clone(),
            ttl,
            verbose: cli.verbose,
            ..Self::default()
        })
    }

    /// Builds the response cache
    ///
    /// Falls back to an in-memory store when no cache directory can be
    /// determined, so the client still works without a home directory.
    pub fn cache_store(&self) -> CacheStore {
        let store: Arc<dyn KeyValueStore> = match &self.cache_dir {
            Some(dir) => Arc::new(FileStore::with_dir(dir.clone())),
            None => match FileStore::new() {
                Some(store) => Arc::new(store),
                None => {
                    warn!("No cache directory available, caching in memory only");
                    Arc::new(MemoryStore::new())
                }
            },
        };
        CacheStore::new(store)
    }

    /// Builds the fetcher with the configured proxy routes
    pub fn fetcher(&self) -> ResilientFetcher {
        ResilientFetcher::new().with_proxies(self.proxies.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.cache_dir.is_none());
        assert_eq!(config.ttl, Duration::from_secs(24 * 60 * 60));
        assert_eq!(config.proxies.len(), DEFAULT_PROXIES.len());
        assert!(!config.verbose);
    }

    #[test]
    fn test_config_from_cli_applies_overrides() {
        let cli = Cli::parse_from([
            "podcaster",
            "--cache-dir",
            "/tmp/pc",
            "--ttl-hours",
            "3",
            "--verbose",
            "top",
        ]);
        let config = Config::from_cli(&cli).unwrap();

        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/pc")));
        assert_eq!(config.ttl, Duration::from_secs(3 * 3600));
        assert!(config.verbose);
    }

    #[test]
    fn test_config_from_cli_rejects_zero_ttl() {
        let cli = Cli::parse_from(["podcaster", "--ttl-hours", "0", "top"]);
        assert!(Config::from_cli(&cli).is_err());
    }

    #[test]
    fn test_cache_store_uses_configured_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config = Config {
            cache_dir: Some(temp_dir.path().to_path_buf()),
            ..Config::default()
        };

        config.cache_store().set("podcasts-list", &[1, 2, 3]);

        let stored = FileStore::with_dir(temp_dir.path().to_path_buf()).keys().unwrap();
        assert_eq!(stored, vec!["podcaster:podcasts-list".to_string()]);
    }

    #[test]
    fn test_fetcher_uses_configured_proxies() {
        let config = Config {
            proxies: DEFAULT_PROXIES[..1].to_vec(),
            ..Config::default()
        };
        assert_eq!(config.fetcher().proxies(), &DEFAULT_PROXIES[..1]);
    }
}
