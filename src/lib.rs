//! Spotify Playlist Sorter Library
//!
//! This library reorders a Spotify playlist by one of its tracks' audio
//! features and writes the result into a sibling playlist. The work is split
//! into four stages that run strictly one after another:
//!
//! 1. Resolve the source playlist by a fuzzy name match.
//! 2. Fetch its track ids page by page.
//! 3. Fetch one feature vector per track, honor the optional length budget
//!    and sort by the requested feature.
//! 4. Create or clear the destination playlist and append the sorted tracks.
//!
//! # Modules
//!
//! - `cli` - Command-line workflow that composes the stages
//! - `config` - Configuration from environment variables and `.env` files
//! - `error` - Error type shared by every stage
//! - `management` - Sorting and playlist synchronisation logic
//! - `spotify` - Spotify Web API boundary with the shared retry policy
//! - `types` - Wire formats and table rows
//! - `utils` - Pure helper functions
//!
//! # Example
//!
//! ```
//! use playlist_sorter::{cli, config, spotify::SpotifyContext};
//!
//! #[tokio::main]
//! async fn main() -> playlist_sorter::error::Result<()> {
//!     if let Err(e) = config::load_env().await {
//!         eprintln!("Configuration error: {}", e);
//!     }
//!     let ctx = SpotifyContext::from_config("BQC...")?;
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod spotify;
pub mod types;
pub mod utils;

/// Prints an informational message with a blue bullet point.
///
/// Used for stage boundaries and general status updates.
///
/// # Example
///
/// ```
/// info!("Fetching {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Playlist {} written", name);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Terminates the process with exit code 1 right after printing, so it is
/// only used by the binary for unrecoverable errors. Library code returns
/// [`error::Error`] instead.
///
/// # Example
///
/// ```
/// error!("Cannot find playlist {}", name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues such as retried requests or skipped tracks.
///
/// # Example
///
/// ```
/// warning!("Request failed, retrying in {:?}", delay);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
