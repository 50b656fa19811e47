//! Command-line interface parsing for the podcaster client
//!
//! This module handles parsing of CLI arguments using clap: the subcommands for
//! browsing the podcast directory and managing the local response cache.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The TTL is not a positive whole number of hours
    #[error("Invalid TTL: '{0}'. Expected a whole number of hours greater than zero")]
    InvalidTtl(String),

    /// The podcast id is not numeric
    #[error("Invalid podcast id: '{0}'. Podcast ids are numeric")]
    InvalidPodcastId(String),
}

/// Podcaster - browse the podcast directory from the terminal
#[derive(Parser, Debug)]
#[command(name = "podcaster")]
#[command(about = "Podcast directory client with response caching and CORS-proxy fallback")]
#[command(version)]
pub struct Cli {
    /// Directory for cached responses (defaults to the XDG cache directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// How long fetched responses stay cached, in hours (default: 24)
    #[arg(long, global = true, value_name = "HOURS")]
    pub ttl_hours: Option<String>,

    /// Log every route attempt and cache decision to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the top podcasts list
    Top,

    /// Show a podcast and its latest episodes
    Podcast {
        /// iTunes podcast id
        id: String,
    },

    /// Fetch any JSON URL through the cache and proxy chain
    Fetch {
        /// URL to fetch
        url: String,
        /// Only try the direct request, no proxies
        #[arg(long)]
        direct: bool,
        /// Neither read nor write the cache
        #[arg(long)]
        no_cache: bool,
    },

    /// Inspect or manage the response cache
    #[command(subcommand)]
    Cache(CacheCommand),
}

/// Cache management actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CacheCommand {
    /// Print whether a fresh entry exists for KEY
    Has { key: String },
    /// Delete the entry for KEY
    Remove { key: String },
    /// Delete every cached entry
    Clear,
}

/// Parses a TTL argument given in hours.
///
/// # Returns
/// * `Ok(Duration)` for a positive whole number of hours
/// * `Err(CliError::InvalidTtl)` otherwise
pub fn parse_ttl_hours(s: &str) -> Result<Duration, CliError> {
    match s.trim().parse::<u64>() {
        Ok(hours) if hours > 0 => Ok(Duration::from_secs(hours * 60 * 60)),
        _ => Err(CliError::InvalidTtl(s.to_string())),
    }
}

/// Checks that a podcast id is a non-empty run of digits.
pub fn parse_podcast_id(s: &str) -> Result<String, CliError> {
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
        Ok(s.to_string())
    } else {
        Err(CliError::InvalidPodcastId(s.to_string()))
    }
}
