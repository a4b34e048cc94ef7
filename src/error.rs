//! Error types for the core components.
//!
//! Each concern gets its own enum so callers can tell a configuration gap from a
//! protocol failure or a partially completed playlist save. The CLI glue collapses
//! them into [`crate::Res`] when it only needs to print them.

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration value: {0}")]
    Missing(&'static str),
    #[error("Invalid URL in {var}: {reason}")]
    InvalidUrl { var: &'static str, reason: String },
    #[error("Cannot prepare configuration directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot read .env file: {0}")]
    Dotenv(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage contains malformed data: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum PkceError {
    #[error("Code verifier length must be between 43 and 128, got {0}")]
    InvalidLength(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A code came back but no verifier was saved before the redirect.
    #[error("Code verifier not found in storage; the authorization redirect has no matching request")]
    MissingVerifier,
    #[error("Failed to exchange code for token (HTTP {status})")]
    TokenExchange { status: StatusCode },
    #[error("Token endpoint returned a malformed body: {0}")]
    MalformedTokenResponse(String),
    #[error("Authorization was denied: {0}")]
    AuthorizationDenied(String),
    #[error("Cannot build authorization URL: {0}")]
    InvalidUrl(String),
    #[error("Token request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Pkce(#[from] PkceError),
}

#[derive(Debug, thiserror::Error)]
pub enum PlaylistError {
    #[error("Empty track list")]
    EmptyTrackList,
    #[error("Failed to create playlist (HTTP {status})")]
    CreateFailed { status: StatusCode },
    #[error("Create playlist response carried no playlist id")]
    MissingPlaylistId,
    /// The playlist was created but is still empty. No rollback is attempted.
    #[error("Playlist {playlist_id} was created but tracks could not be added{}", status_suffix(.status))]
    ItemsNotAdded {
        playlist_id: String,
        status: Option<StatusCode>,
    },
    #[error("Playlist request failed: {0}")]
    Http(#[from] reqwest::Error),
}

fn status_suffix(status: &Option<StatusCode>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}
