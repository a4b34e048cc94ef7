//! Configuration management for jammcli.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. The OAuth client id and redirect URI are required;
//! endpoints, scope and the callback server address fall back to Spotify defaults.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, io::ErrorKind, path::PathBuf};

use reqwest::Url;

use crate::error::ConfigError;

pub const ENV_CLIENT_ID: &str = "SPOTIFY_API_AUTH_CLIENT_ID";
pub const ENV_REDIRECT_URI: &str = "SPOTIFY_API_REDIRECT_URI";
pub const ENV_SCOPE: &str = "SPOTIFY_API_AUTH_SCOPE";
pub const ENV_AUTH_URL: &str = "SPOTIFY_API_AUTH_URL";
pub const ENV_TOKEN_URL: &str = "SPOTIFY_API_TOKEN_URL";
pub const ENV_API_URL: &str = "SPOTIFY_API_URL";
pub const ENV_SERVER_ADDRESS: &str = "SERVER_ADDRESS";

pub const DEFAULT_SCOPE: &str = "user-read-private user-read-email playlist-modify-public";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";

/// Returns the platform-specific data directory used for `.env` and storage.
///
/// - Linux: `~/.local/share/jammcli`
/// - macOS: `~/Library/Application Support/jammcli`
/// - Windows: `%LOCALAPPDATA%/jammcli`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("jammcli");
    path
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the directory if it doesn't exist. A missing `.env` file is fine since
/// every value may also come from the process environment; a file that exists but
/// cannot be parsed is reported.
///
/// # Example
///
/// ```
/// use jammcli::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), ConfigError> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    match dotenv::from_path(&path) {
        Ok(()) => Ok(()),
        Err(dotenv::Error::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ConfigError::Dotenv(e.to_string())),
    }
}

/// Runtime configuration for the OAuth flow and the Web API endpoints.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub server_addr: String,
}

impl Config {
    /// Creates a configuration with Spotify defaults for everything but the two
    /// values that identify the registered application.
    pub fn new(client_id: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            scope: DEFAULT_SCOPE.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            server_addr: DEFAULT_SERVER_ADDRESS.to_string(),
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn with_auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = url.into();
        self
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_server_addr(mut self, addr: impl Into<String>) -> Self {
        self.server_addr = addr.into();
        self
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when the client id or redirect URI is unset
    /// or empty, and [`ConfigError::InvalidUrl`] when any URL does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let client_id = value(ENV_CLIENT_ID).ok_or(ConfigError::Missing(ENV_CLIENT_ID))?;
        let redirect_uri = value(ENV_REDIRECT_URI).ok_or(ConfigError::Missing(ENV_REDIRECT_URI))?;

        let mut config = Self::new(client_id, redirect_uri);
        if let Some(scope) = value(ENV_SCOPE) {
            config = config.with_scope(scope);
        }
        if let Some(url) = value(ENV_AUTH_URL) {
            config = config.with_auth_url(url);
        }
        if let Some(url) = value(ENV_TOKEN_URL) {
            config = config.with_token_url(url);
        }
        if let Some(url) = value(ENV_API_URL) {
            config = config.with_api_url(url);
        }
        if let Some(addr) = value(ENV_SERVER_ADDRESS) {
            config = config.with_server_addr(addr);
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (var, url) in [
            (ENV_REDIRECT_URI, &self.redirect_uri),
            (ENV_AUTH_URL, &self.auth_url),
            (ENV_TOKEN_URL, &self.token_url),
            (ENV_API_URL, &self.api_url),
        ] {
            Url::parse(url).map_err(|e| ConfigError::InvalidUrl {
                var,
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_required_values_with_defaults() {
        let config = Config::from_lookup(lookup(&[
            (ENV_CLIENT_ID, "abc123"),
            (ENV_REDIRECT_URI, "http://127.0.0.1:8888/callback"),
        ]))
        .unwrap();

        assert_eq!(config.client_id, "abc123");
        assert_eq!(config.scope, DEFAULT_SCOPE);
        assert_eq!(config.token_url, DEFAULT_TOKEN_URL);
        assert_eq!(config.server_addr, DEFAULT_SERVER_ADDRESS);
    }

    #[test]
    fn test_empty_client_id_is_missing() {
        let err = Config::from_lookup(lookup(&[
            (ENV_CLIENT_ID, ""),
            (ENV_REDIRECT_URI, "http://127.0.0.1:8888/callback"),
        ]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::Missing(ENV_CLIENT_ID)));
    }

    #[test]
    fn test_missing_redirect_uri() {
        let err = Config::from_lookup(lookup(&[(ENV_CLIENT_ID, "abc123")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ENV_REDIRECT_URI)));
    }

    #[test]
    fn test_invalid_api_url() {
        let err = Config::from_lookup(lookup(&[
            (ENV_CLIENT_ID, "abc123"),
            (ENV_REDIRECT_URI, "http://127.0.0.1:8888/callback"),
            (ENV_API_URL, "not a url"),
        ]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidUrl { var: ENV_API_URL, .. }));
    }

    #[test]
    fn test_api_url_trailing_slash_trimmed() {
        let config = Config::new("id", "http://localhost/callback")
            .with_api_url("http://localhost:9000/v1/");
        assert_eq!(config.api_url, "http://localhost:9000/v1");
    }
}
