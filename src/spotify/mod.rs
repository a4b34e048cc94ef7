//! # Spotify Integration Module
//!
//! This module is the integration layer between jammcli and the Spotify Web API.
//! It owns the authentication state machine and the two authenticated request
//! families built on top of it.
//!
//! ## Architecture
//!
//! ```text
//! CLI Layer (search, draft, save)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (OAuth 2.0 PKCE state machine)
//!     ├── Catalog Search
//!     └── Playlist Operations (Create, Add Items)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! - [`auth`] - [`auth::Authenticator`] decides whether a stored session can be
//!   reused, whether a received authorization code must be exchanged, or whether the
//!   user agent has to be sent to the authorization endpoint. The redirect is handed
//!   back to the caller as [`auth::SessionOutcome::NeedsRedirect`] instead of being
//!   performed inline.
//! - [`search`] - Track search. Every failure degrades to an empty result list.
//! - [`playlist`] - Playlist creation followed by a single batch item insertion.
//!   There is no rollback when the second step fails.
//!
//! ## Authorization Errors
//!
//! HTTP 401, 403 and 429 on any authenticated call are classified as an
//! [`ApiErrorClass`] and handed to the [`Notifier`] before the call continues down
//! its normal failure path. The terminal implementation lives in the CLI layer.
//!
//! ## API Coverage
//!
//! - `POST /api/token` - Authorization code exchange
//! - `GET /search` - Track search
//! - `POST /me/playlists` - Create playlist
//! - `POST /playlists/{playlist_id}/items` - Add items to playlist

use std::{fmt, sync::Arc};

use reqwest::{Client, StatusCode};

use crate::config::Config;

pub mod auth;
pub mod playlist;
pub mod search;

/// Authorization-class HTTP failures worth telling the user about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorClass {
    Unauthorized,
    Forbidden,
    RateLimited,
}

impl ApiErrorClass {
    pub fn from_status(status: StatusCode) -> Option<Self> {
        match status {
            StatusCode::UNAUTHORIZED => Some(Self::Unauthorized),
            StatusCode::FORBIDDEN => Some(Self::Forbidden),
            StatusCode::TOO_MANY_REQUESTS => Some(Self::RateLimited),
            _ => None,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Unauthorized => "Unauthorized (401): Access token is invalid or expired.",
            Self::Forbidden => {
                "Forbidden (403): You do not have permission to access this resource."
            }
            Self::RateLimited => {
                "Too Many Requests (429): You have exceeded the rate limit. Please try again later."
            }
        }
    }
}

impl fmt::Display for ApiErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Receives user-visible notifications about authorization-class failures.
pub trait Notifier: Send + Sync {
    fn notify(&self, class: ApiErrorClass);
}

/// Classifies `status` and notifies when it is an authorization-class failure.
pub fn handle_response_errors(status: StatusCode, notifier: &dyn Notifier) -> Option<ApiErrorClass> {
    let class = ApiErrorClass::from_status(status)?;
    notifier.notify(class);
    Some(class)
}

/// Shared HTTP client, Web API base URL and notifier for authenticated calls.
#[derive(Clone)]
pub struct SpotifyApi {
    pub(crate) http: Client,
    pub(crate) api_url: String,
    pub(crate) notifier: Arc<dyn Notifier>,
}

impl SpotifyApi {
    pub fn new(api_url: impl Into<String>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            notifier,
        }
    }

    pub fn from_config(config: &Config, notifier: Arc<dyn Notifier>) -> Self {
        Self::new(config.api_url.clone(), notifier)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    fn notify(&self, status: StatusCode) -> Option<ApiErrorClass> {
        handle_response_errors(status, self.notifier.as_ref())
    }
}
