//! Integration tests for the podcaster binary
//!
//! Runs the compiled CLI against temporary cache directories and a local HTTP
//! server, so nothing here touches the public network.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_podcaster"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute podcaster")
}

fn dir_arg(dir: &Path) -> String {
    dir.to_string_lossy().into_owned()
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("podcaster"), "Help should mention podcaster");
    assert!(stdout.contains("fetch"), "Help should list the fetch command");
    assert!(stdout.contains("cache"), "Help should list the cache command");
}

#[test]
fn test_invalid_ttl_prints_error_and_exits() {
    let output = run_cli(&["--ttl-hours", "0", "top"]);
    assert!(!output.status.success(), "Expected zero TTL to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid TTL"),
        "Should print error message about the TTL: {}",
        stderr
    );
}

#[test]
fn test_invalid_podcast_id_prints_error_and_exits() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output = run_cli(&["podcast", "not-a-number", "--cache-dir", &dir_arg(temp_dir.path())]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid podcast id"), "stderr: {}", stderr);
}

#[test]
fn test_cache_has_on_empty_cache_prints_false() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output = run_cli(&["cache", "has", "podcasts-list", "--cache-dir", &dir_arg(temp_dir.path())]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "false");
}

#[test]
fn test_fetch_caches_response_and_clear_removes_it() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/feed.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"podcasts":[{"id":"123","name":"Test Podcast"}]}"#)
        .expect(1)
        .create();
    let url = format!("{}/feed.json", server.url());

    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let cache_dir = dir_arg(temp_dir.path());

    // The second fetch is served from the cache, so the server sees one request.
    for _ in 0..2 {
        let output = run_cli(&["fetch", &url, "--direct", "--cache-dir", &cache_dir]);
        assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Test Podcast"));
    }
    mock.assert();

    let output = run_cli(&["cache", "has", &url, "--cache-dir", &cache_dir]);
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "true");

    let output = run_cli(&["cache", "clear", "--cache-dir", &cache_dir]);
    assert!(output.status.success());

    let output = run_cli(&["cache", "has", &url, "--cache-dir", &cache_dir]);
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "false");
}

#[test]
fn test_direct_fetch_failure_exits_with_status_message() {
    let mut server = mockito::Server::new();
    let _mock = server.mock("GET", "/missing").with_status(404).create();
    let url = format!("{}/missing", server.url());

    let output = run_cli(&["fetch", &url, "--direct", "--no-cache"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error 404"), "stderr: {}", stderr);
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use podcaster::cli::{CacheCommand, Cli, Command};
    use podcaster::config::Config;

    #[test]
    fn test_cli_podcast_with_id() {
        let cli = Cli::parse_from(["podcaster", "podcast", "934552872"]);
        assert_eq!(
            cli.command,
            Command::Podcast {
                id: "934552872".to_string()
            }
        );
    }

    #[test]
    fn test_cli_cache_remove() {
        let cli = Cli::parse_from(["podcaster", "cache", "remove", "podcasts-list"]);
        assert_eq!(
            cli.command,
            Command::Cache(CacheCommand::Remove {
                key: "podcasts-list".to_string()
            })
        );
    }

    #[test]
    fn test_config_from_cli_defaults() {
        let cli = Cli::parse_from(["podcaster", "top"]);
        let config = Config::from_cli(&cli).unwrap();
        assert!(config.cache_dir.is_none());
        assert!(!config.verbose);
    }
}
