use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::Utc;
use reqwest::{Client, Url};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{
    Res,
    config::Config,
    error::AuthError,
    management::{CredentialStore, KeyValueStore},
    server, success,
    types::{CallbackParams, Session, TokenResponse},
    utils::{self, PkcePair},
    warning,
};

/// Query parameters the authorization server may append to the redirect URI.
const CALLBACK_PARAMS: &[&str] = &["code", "state", "error", "error_description"];

/// How long to wait for the browser to come back to the callback server.
pub const CALLBACK_TIMEOUT: Duration = Duration::from_secs(120);

/// Where the user agent currently is, as far as the authentication flow cares.
///
/// After the authorization server redirects back, this carries the `code` (or
/// `error`) query parameter. The authenticator strips those once consumed so the
/// same location cannot be replayed.
#[derive(Debug, Clone, Default)]
pub struct Location {
    url: Option<Url>,
}

impl Location {
    /// A location that did not come from a redirect.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(url: Url) -> Self {
        Self { url: Some(url) }
    }

    /// Rebuilds the redirect target from the registered redirect URI and the
    /// parameters captured by the callback server.
    pub fn from_callback(redirect_uri: &str, params: &CallbackParams) -> Result<Self, AuthError> {
        let mut url = Url::parse(redirect_uri).map_err(|e| AuthError::InvalidUrl(e.to_string()))?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        Ok(Self::new(url))
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn param(&self, name: &str) -> Option<String> {
        self.url
            .as_ref()?
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    pub fn code(&self) -> Option<String> {
        self.param("code").filter(|c| !c.is_empty())
    }

    fn strip_params(&mut self, names: &[&str]) {
        let Some(url) = self.url.as_mut() else {
            return;
        };

        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !names.contains(&key.as_ref()))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
    }
}

/// Result of [`Authenticator::ensure_session`].
#[derive(Debug)]
pub enum SessionOutcome {
    /// A valid session is stored; authenticated calls may proceed.
    Ready(Session),
    /// The user agent must be sent to this authorization URL. Nothing else should
    /// happen in the current context.
    NeedsRedirect(Url),
    Failed(AuthError),
}

/// Authentication state machine for the Authorization Code flow with PKCE.
///
/// ```text
/// NoSession → Redirecting → Exchanging → HasSession → Expired(→NoSession)
/// ```
pub struct Authenticator<S> {
    client_id: String,
    redirect_uri: String,
    scope: String,
    auth_url: String,
    token_url: String,
    credentials: CredentialStore<S>,
    http: Client,
}

impl<S: KeyValueStore> Authenticator<S> {
    pub fn new(config: &Config, credentials: CredentialStore<S>) -> Self {
        Self {
            client_id: config.client_id.clone(),
            redirect_uri: config.redirect_uri.clone(),
            scope: config.scope.clone(),
            auth_url: config.auth_url.clone(),
            token_url: config.token_url.clone(),
            credentials,
            http: Client::new(),
        }
    }

    /// Single entry point before every authenticated action.
    ///
    /// 1. A stored, unexpired session is returned without any network call.
    /// 2. An expired session is deleted.
    /// 3. An `error` on the location means the user declined; it is stripped and
    ///    reported as [`AuthError::AuthorizationDenied`].
    /// 4. A `code` on the location is exchanged for a token using the stored
    ///    verifier. A missing verifier fails without touching the network.
    /// 5. Otherwise a fresh verifier is stored and the authorization URL returned.
    ///
    /// # Arguments
    ///
    /// * `location` - Where the user agent is now. Consumed `code`/`error`
    ///   parameters are removed from it so the same redirect cannot be replayed.
    ///
    /// # Returns
    ///
    /// Never an `Err`: storage and protocol failures come back as
    /// [`SessionOutcome::Failed`]. The caller is expected to clear local token
    /// state and let the user start over.
    ///
    /// # Example
    ///
    /// ```
    /// match authenticator.ensure_session(&mut Location::none()).await {
    ///     SessionOutcome::Ready(session) => call_api(&session.access_token).await,
    ///     SessionOutcome::NeedsRedirect(url) => open_browser(&url),
    ///     SessionOutcome::Failed(e) => warning!("Authentication failed: {}", e),
    /// }
    /// ```
    pub async fn ensure_session(&self, location: &mut Location) -> SessionOutcome {
        match self.advance(location).await {
            Ok(outcome) => outcome,
            Err(e) => SessionOutcome::Failed(e),
        }
    }

    async fn advance(&self, location: &mut Location) -> Result<SessionOutcome, AuthError> {
        if let Some(session) = self.credentials.load_session().await? {
            if session.is_valid_at(Utc::now().timestamp_millis()) {
                return Ok(SessionOutcome::Ready(session));
            }
            self.credentials.clear_session().await?;
        }

        if let Some(reason) = location.param("error") {
            location.strip_params(CALLBACK_PARAMS);
            self.credentials.clear_verifier().await?;
            return Err(AuthError::AuthorizationDenied(reason));
        }

        if let Some(code) = location.code() {
            location.strip_params(CALLBACK_PARAMS);
            let verifier = self
                .credentials
                .load_verifier()
                .await?
                .ok_or(AuthError::MissingVerifier)?;

            // the verifier is single use whatever the exchange outcome
            let token = match self.exchange_code_pkce(&code, &verifier).await {
                Ok(token) => token,
                Err(e) => {
                    self.credentials.clear_verifier().await?;
                    return Err(e);
                }
            };

            let session = self
                .credentials
                .save_session(&token.access_token, token.expires_in)
                .await?;
            if let Err(e) = self.credentials.clear_verifier().await {
                warning!("Failed to clear used code verifier: {}", e);
            }
            return Ok(SessionOutcome::Ready(session));
        }

        let pkce = PkcePair::generate(utils::CODE_VERIFIER_LENGTH)?;
        self.credentials.save_verifier(&pkce.verifier).await?;
        let url = self.authorization_url(&pkce.challenge)?;
        Ok(SessionOutcome::NeedsRedirect(url))
    }

    pub fn authorization_url(&self, code_challenge: &str) -> Result<Url, AuthError> {
        Url::parse_with_params(
            &self.auth_url,
            &[
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("scope", self.scope.as_str()),
                ("code_challenge_method", "S256"),
                ("code_challenge", code_challenge),
                ("redirect_uri", self.redirect_uri.as_str()),
            ],
        )
        .map_err(|e| AuthError::InvalidUrl(e.to_string()))
    }

    /// Exchanges an authorization code plus the matching verifier for a token.
    ///
    /// Non-2xx responses and bodies without `access_token`/`expires_in` are
    /// errors; nothing is persisted here.
    pub async fn exchange_code_pkce(
        &self,
        code: &str,
        verifier: &str,
    ) -> Result<TokenResponse, AuthError> {
        let res = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("code_verifier", verifier),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(AuthError::TokenExchange { status });
        }

        let body = res.text().await?;
        serde_json::from_str::<TokenResponse>(&body)
            .map_err(|e| AuthError::MalformedTokenResponse(e.to_string()))
    }
}

/// Performs the navigation effect of [`SessionOutcome::NeedsRedirect`].
///
/// Starts the local callback server, opens the authorization URL in the default
/// browser and waits for the authorization server to redirect back. Returns the
/// resulting location, which carries either a `code` or an `error`.
pub async fn follow_redirect(config: &Config, authorize_url: &Url) -> Res<Location> {
    let shared_state: Arc<Mutex<Option<CallbackParams>>> = Arc::new(Mutex::new(None));

    let listener = TcpListener::bind(&config.server_addr).await?;
    let server_state = Arc::clone(&shared_state);
    let handle = tokio::spawn(async move {
        if let Err(e) = server::serve(listener, server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    if webbrowser::open(authorize_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            authorize_url
        )
    }

    let params = wait_for_callback(shared_state, CALLBACK_TIMEOUT).await;
    handle.abort();

    match params {
        Some(params) => {
            success!("Received authorization callback.");
            Ok(Location::from_callback(&config.redirect_uri, &params)?)
        }
        None => Err("Authentication timed out waiting for the browser callback.".into()),
    }
}

async fn wait_for_callback(
    shared_state: Arc<Mutex<Option<CallbackParams>>>,
    max_wait: Duration,
) -> Option<CallbackParams> {
    let start = Instant::now();

    while start.elapsed() < max_wait {
        if let Some(params) = shared_state.lock().await.take() {
            return Some(params);
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_code_and_strip() {
        let url = Url::parse("http://127.0.0.1:8888/callback?code=abc&state=xyz&keep=1").unwrap();
        let mut location = Location::new(url);
        assert_eq!(location.code().as_deref(), Some("abc"));

        location.strip_params(CALLBACK_PARAMS);
        assert_eq!(location.code(), None);
        assert_eq!(location.param("state"), None);
        assert_eq!(location.url().unwrap().query(), Some("keep=1"));
    }

    #[test]
    fn test_strip_removes_empty_query() {
        let url = Url::parse("http://127.0.0.1:8888/callback?code=abc").unwrap();
        let mut location = Location::new(url);
        location.strip_params(CALLBACK_PARAMS);
        assert_eq!(location.url().unwrap().as_str(), "http://127.0.0.1:8888/callback");
    }

    #[test]
    fn test_none_location_has_no_code() {
        let mut location = Location::none();
        assert_eq!(location.code(), None);
        location.strip_params(CALLBACK_PARAMS);
        assert!(location.url().is_none());
    }

    #[test]
    fn test_from_callback_appends_params() {
        let mut params = CallbackParams::new();
        params.insert("code".into(), "a b".into());
        let location = Location::from_callback("http://127.0.0.1:8888/callback", &params).unwrap();
        assert_eq!(location.code().as_deref(), Some("a b"));
    }

    #[tokio::test]
    async fn test_wait_for_callback_times_out() {
        let state = Arc::new(Mutex::new(None));
        let params = wait_for_callback(state, Duration::from_millis(10)).await;
        assert!(params.is_none());
    }

    #[tokio::test]
    async fn test_wait_for_callback_takes_params() {
        let mut params = CallbackParams::new();
        params.insert("code".into(), "abc".into());
        let state = Arc::new(Mutex::new(Some(params)));

        let received = wait_for_callback(Arc::clone(&state), Duration::from_secs(1)).await;
        assert_eq!(received.unwrap().get("code").map(String::as_str), Some("abc"));
        assert!(state.lock().await.is_none());
    }
}
