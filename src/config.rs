//! Configuration management for the playlist sorter.
//!
//! This module loads configuration values from environment variables and an
//! optional `.env` file. Every accessor falls back to a default so the tool
//! runs without any configuration at all; only the access token, which is
//! passed on the command line, is mandatory.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Command-line flags (where a flag exists)
//! 2. Environment variables
//! 3. `.env` file in the local data directory
//! 4. Application defaults

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::warning;

/// Base URL of the Spotify Web API.
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_RETRY_BASE_MS: u64 = 500;
pub const DEFAULT_RETRY_MAX_MS: u64 = 30_000;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the directory structure if it doesn't exist and loads variables
/// from `playlist-sorter/.env` below the platform-specific local data
/// directory. A missing file is not an error since every setting has a
/// default.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/playlist-sorter/.env`
/// - macOS: `~/Library/Application Support/playlist-sorter/.env`
/// - Windows: `%LOCALAPPDATA%/playlist-sorter/.env`
///
/// # Errors
///
/// Returns an error string if the parent directory cannot be created or the
/// `.env` file exists but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| e.to_string())
}

fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("playlist-sorter/.env");
    path
}

/// Returns the Spotify Web API base URL.
///
/// Reads `SPOTIFY_API_URL`, defaulting to [`DEFAULT_API_URL`]. Pointing it at
/// another host is mostly useful for testing against a mock server.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL")
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Returns how many times a failed request is retried after the first attempt.
///
/// Reads `PLAYLIST_SORTER_MAX_RETRIES`, defaulting to [`DEFAULT_MAX_RETRIES`].
pub fn max_retries() -> u32 {
    parse_var("PLAYLIST_SORTER_MAX_RETRIES", DEFAULT_MAX_RETRIES)
}

/// Returns the first backoff delay of the retry policy.
///
/// Reads `PLAYLIST_SORTER_RETRY_BASE_MS` in milliseconds.
pub fn retry_base_delay() -> Duration {
    Duration::from_millis(parse_var(
        "PLAYLIST_SORTER_RETRY_BASE_MS",
        DEFAULT_RETRY_BASE_MS,
    ))
}

/// Returns the upper bound for a single backoff delay.
///
/// Reads `PLAYLIST_SORTER_RETRY_MAX_MS` in milliseconds.
pub fn retry_max_delay() -> Duration {
    Duration::from_millis(parse_var(
        "PLAYLIST_SORTER_RETRY_MAX_MS",
        DEFAULT_RETRY_MAX_MS,
    ))
}

fn parse_var<T: FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warning!(
                    "Ignoring invalid value {:?} for {}, using {}",
                    raw,
                    name,
                    default
                );
                default
            }
        },
        Err(_) => default,
    }
}
