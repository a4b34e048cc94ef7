//! # CLI Module
//!
//! The terminal is the UI layer: it gathers input, shows results and keeps the
//! playlist draft between invocations. Every authenticated command first asks the
//! authenticator for a session through [`Context::require_token`], and stops if the
//! answer is anything but a ready session. Commands that only touch local state
//! take a [`Storage`] and run without any OAuth configuration.
//!
//! ## Commands
//!
//! - [`auth`], [`logout`], [`status`] - Session management
//! - [`search`] - Track search; results are remembered for `draft add`
//! - [`show_draft`], [`add_to_draft`], [`remove_from_draft`], [`rename_draft`],
//!   [`clear_draft`] - Playlist draft editing
//! - [`save`] - Saves the draft as a new playlist

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Url;

use crate::{
    config::Config,
    error,
    error::AuthError,
    info,
    management::{CredentialStore, DraftManager, FileStore},
    spotify::{
        ApiErrorClass, Notifier, SpotifyApi,
        auth::{Authenticator, Location, SessionOutcome, follow_redirect},
    },
    success, warning,
};

mod auth;
mod draft;
mod playlist;
mod search;

pub use auth::auth;
pub use auth::logout;
pub use auth::status;
pub use draft::add_to_draft;
pub use draft::clear_draft;
pub use draft::remove_from_draft;
pub use draft::rename_draft;
pub use draft::show_draft;
pub use playlist::save;
pub use search::search;

/// Prints authorization-class failures and remembers whether the token was rejected.
#[derive(Default)]
pub struct TerminalNotifier {
    unauthorized: AtomicBool,
}

impl TerminalNotifier {
    pub fn take_unauthorized(&self) -> bool {
        self.unauthorized.swap(false, Ordering::Relaxed)
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, class: ApiErrorClass) {
        warning!("{}", class);
        if class == ApiErrorClass::Unauthorized {
            self.unauthorized.store(true, Ordering::Relaxed);
        }
    }
}

/// Local state shared by every command: stored credentials and the draft.
pub struct Storage {
    pub credentials: CredentialStore<FileStore>,
    pub drafts: DraftManager<FileStore>,
}

impl Storage {
    /// Opens the store under the local data directory.
    pub fn open() -> Self {
        Self::new(Arc::new(FileStore::default_location()))
    }

    pub fn new(store: Arc<FileStore>) -> Self {
        Self {
            credentials: CredentialStore::new(Arc::clone(&store)),
            drafts: DraftManager::new(store),
        }
    }
}

/// Everything an authenticated command needs: configuration, storage and the
/// API clients.
pub struct Context {
    pub config: Config,
    pub storage: Storage,
    pub authenticator: Authenticator<FileStore>,
    pub api: SpotifyApi,
    notifier: Arc<TerminalNotifier>,
}

impl Context {
    /// Builds the context from the environment, exiting on configuration errors.
    pub fn load() -> Self {
        let config = match Config::from_env() {
            Ok(config) => config,
            Err(e) => error!("Cannot load configuration: {}", e),
        };

        let storage = Storage::open();
        let notifier = Arc::new(TerminalNotifier::default());

        Self {
            authenticator: Authenticator::new(&config, storage.credentials.clone()),
            api: SpotifyApi::from_config(&config, notifier.clone()),
            storage,
            notifier,
            config,
        }
    }

    pub fn credentials(&self) -> &CredentialStore<FileStore> {
        &self.storage.credentials
    }

    /// Returns a usable access token, or `None` when the command has to stop.
    ///
    /// When a redirect is needed the authorization round trip is completed, but
    /// the original command is not resumed; the user re-runs it.
    pub async fn require_token(&self) -> Option<String> {
        let mut location = Location::none();
        match self.authenticator.ensure_session(&mut location).await {
            SessionOutcome::Ready(session) => Some(session.access_token),
            SessionOutcome::NeedsRedirect(url) => {
                info!("Authentication needed. Opening the Spotify authorization page...");
                if self.complete_redirect(&url).await {
                    info!("Run the command again to continue.");
                }
                None
            }
            SessionOutcome::Failed(e) => {
                self.fail_auth(e).await;
                None
            }
        }
    }

    /// Sends the user to `url`, waits for the callback and exchanges the code.
    pub async fn complete_redirect(&self, url: &Url) -> bool {
        let mut location = match follow_redirect(&self.config, url).await {
            Ok(location) => location,
            Err(e) => {
                warning!("{}", e);
                self.reset_credentials().await;
                return false;
            }
        };

        match self.authenticator.ensure_session(&mut location).await {
            SessionOutcome::Ready(session) => {
                success!(
                    "Authentication successful! Session valid until {}.",
                    format_expiry(session.expires_at)
                );
                true
            }
            SessionOutcome::NeedsRedirect(_) => {
                warning!("The authorization server did not return a code.");
                self.reset_credentials().await;
                false
            }
            SessionOutcome::Failed(e) => {
                self.fail_auth(e).await;
                false
            }
        }
    }

    /// Drops the stored session after the API rejected its token.
    pub async fn invalidate_if_unauthorized(&self) {
        if self.notifier.take_unauthorized() {
            if let Err(e) = self.credentials().clear_session().await {
                warning!("Failed to clear rejected session: {}", e);
            }
        }
    }

    async fn fail_auth(&self, e: AuthError) {
        warning!("Authentication failed: {}", e);
        self.reset_credentials().await;
        warning!("Local token state was cleared. Please retry from the start.");
    }

    async fn reset_credentials(&self) {
        if let Err(e) = self.credentials().reset().await {
            warning!("Failed to clear local token state: {}", e);
        }
    }
}

pub(crate) fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

pub(crate) fn format_expiry(expires_at: i64) -> String {
    chrono::DateTime::from_timestamp_millis(expires_at)
        .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| expires_at.to_string())
}
