//! jammcli library
//!
//! Core of a command-line client that signs in to Spotify with the OAuth 2.0
//! Authorization Code flow with PKCE, searches the track catalog and saves
//! playlists assembled from the results.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error types for configuration, storage and API failures
//! - `management` - Key/value storage, credentials and the playlist draft
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Authentication state machine and Web API client
//! - `types` - Data structures and type definitions
//! - `utils` - PKCE generation and display helpers
//!
//! # Example
//!
//! ```
//! use jammcli::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> jammcli::Res<()> {
//!     config::load_env().await?;
//!     let storage = cli::Storage::open();
//!     cli::status(&storage).await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Boxed error alias used by the CLI glue, where failures are only printed.
///
/// Core components return the typed errors from [`error`]; they convert into
/// this alias through `?` wherever the caller only needs to report them.
///
/// # Example
///
/// ```
/// use jammcli::Res;
///
/// async fn redirect_target() -> Res<String> {
///     Ok("http://127.0.0.1:8888/callback".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Used for progress and hints that need no attention from the user.
///
/// # Arguments
///
/// Same as `println!`: a format string followed by its arguments.
///
/// # Example
///
/// ```
/// info!("Opening the Spotify authorization page...");
/// info!("Found {} tracks", count);
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
/// # Arguments
///
/// Same as `println!`: a format string followed by its arguments.
///
/// # Example
///
/// ```
/// success!("Playlist \"{}\" saved", name);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits with code 1.
///
/// Only for the CLI layer; library code returns errors instead.
///
/// # Arguments
///
/// Same as `println!`: a format string followed by its arguments.
///
/// # Example
///
/// ```
/// error!("Cannot load configuration: {}", e);
/// // not reached
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Authorization-class API failures are reported through this channel.
///
/// # Arguments
///
/// Same as `println!`: a format string followed by its arguments.
///
/// # Example
///
/// ```
/// warning!("Failed to clear draft: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
