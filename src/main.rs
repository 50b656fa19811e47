//! Podcaster - browse the podcast directory from the terminal
//!
//! Fetches the top podcasts list and podcast details from iTunes, caching
//! responses locally and retrying through CORS proxies when direct access fails.

use clap::Parser;
use serde::Serialize;
use serde_json::Value;
use std::process::ExitCode;

use podcaster::cli::{parse_podcast_id, CacheCommand, Cli, Command};
use podcaster::config::Config;
use podcaster::directory::PodcastDirectory;
use podcaster::logging;

/// Prints a value as pretty JSON on stdout
fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Executes the parsed command
async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_cli(&cli)?;
    let cache = config.cache_store();
    let fetcher = config.fetcher();

    match cli.command {
        Command::Top => {
            let directory = PodcastDirectory::new(cache, fetcher).with_ttl(config.ttl);
            print_json(&directory.top_podcasts().await?)?;
        }
        Command::Podcast { id } => {
            let id = parse_podcast_id(&id)?;
            let directory = PodcastDirectory::new(cache, fetcher).with_ttl(config.ttl);
            print_json(&directory.podcast_detail(&id).await?)?;
        }
        Command::Fetch {
            url,
            direct,
            no_cache,
        } => {
            if !no_cache {
                if let Some(cached) = cache.get::<Value>(&url) {
                    print_json(&cached)?;
                    return Ok(());
                }
            }

            let value: Value = if direct {
                fetcher.get_direct(&url).await?
            } else {
                fetcher.get(&url).await?
            };

            if !no_cache {
                cache.set_with_ttl(&url, &value, config.ttl);
            }
            print_json(&value)?;
        }
        Command::Cache(CacheCommand::Has { key }) => {
            println!("{}", cache.has(&key));
        }
        Command::Cache(CacheCommand::Remove { key }) => {
            cache.remove(&key);
        }
        Command::Cache(CacheCommand::Clear) => {
            cache.clear();
        }
    }

    Ok(())
}
