use std::sync::Arc;

use chrono::Utc;

use crate::{error::StoreError, management::KeyValueStore, types::Session};

pub const KEY_CODE_VERIFIER: &str = "code_verifier";
pub const KEY_SESSION: &str = "spotify_auth";

/// Verifier slot and the single session slot on top of a key/value store.
///
/// The verifier lives under `code_verifier` between sending the user to the
/// authorization server and exchanging the returned code. The session lives
/// under `spotify_auth` as `{"access_token": ..., "expires_at": <epoch ms>}`
/// and is replaced as a whole on every save, so at most one session exists.
///
/// Cloning is cheap; clones share the underlying store.
///
/// # Example
///
/// ```
/// let credentials = CredentialStore::new(Arc::new(FileStore::default_location()));
/// let session = credentials.save_session(&token.access_token, token.expires_in).await?;
/// ```
pub struct CredentialStore<S> {
    store: Arc<S>,
}

impl<S> Clone for CredentialStore<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore> CredentialStore<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub async fn save_verifier(&self, verifier: &str) -> Result<(), StoreError> {
        self.store.set(KEY_CODE_VERIFIER, verifier).await
    }

    pub async fn load_verifier(&self) -> Result<Option<String>, StoreError> {
        self.store.get(KEY_CODE_VERIFIER).await
    }

    pub async fn clear_verifier(&self) -> Result<(), StoreError> {
        self.store.delete(KEY_CODE_VERIFIER).await
    }

    /// Persists a new session expiring `lifetime_secs` from now, replacing any old one.
    pub async fn save_session(
        &self,
        access_token: &str,
        lifetime_secs: u64,
    ) -> Result<Session, StoreError> {
        let lifetime_millis = i64::try_from(lifetime_secs)
            .unwrap_or(i64::MAX)
            .saturating_mul(1000);
        let session = Session {
            access_token: access_token.to_string(),
            expires_at: Utc::now().timestamp_millis().saturating_add(lifetime_millis),
        };
        self.put_session(&session).await?;
        Ok(session)
    }

    pub async fn put_session(&self, session: &Session) -> Result<(), StoreError> {
        let json = serde_json::to_string(session)?;
        self.store.set(KEY_SESSION, &json).await
    }

    pub async fn load_session(&self) -> Result<Option<Session>, StoreError> {
        match self.store.get(KEY_SESSION).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub async fn clear_session(&self) -> Result<(), StoreError> {
        self.store.delete(KEY_SESSION).await
    }

    /// Drops everything tied to the current or an abandoned authentication attempt.
    pub async fn reset(&self) -> Result<(), StoreError> {
        self.clear_session().await?;
        self.clear_verifier().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::management::MemoryStore;

    fn credentials() -> CredentialStore<MemoryStore> {
        CredentialStore::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_verifier_slot() {
        let creds = credentials();
        assert_eq!(creds.load_verifier().await.unwrap(), None);

        creds.save_verifier("first").await.unwrap();
        creds.save_verifier("second").await.unwrap();
        assert_eq!(creds.load_verifier().await.unwrap().as_deref(), Some("second"));

        creds.clear_verifier().await.unwrap();
        assert_eq!(creds.load_verifier().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_session_computes_expiry() {
        let creds = credentials();
        let before = Utc::now().timestamp_millis();
        let session = creds.save_session("T", 3600).await.unwrap();
        let after = Utc::now().timestamp_millis();

        assert!(session.expires_at >= before + 3_600_000);
        assert!(session.expires_at <= after + 3_600_000);
        assert_eq!(creds.load_session().await.unwrap(), Some(session));
    }

    #[tokio::test]
    async fn test_new_session_overwrites_old() {
        let creds = credentials();
        creds.save_session("old", 60).await.unwrap();
        creds.save_session("new", 60).await.unwrap();

        let session = creds.load_session().await.unwrap().unwrap();
        assert_eq!(session.access_token, "new");
    }

    #[tokio::test]
    async fn test_session_layout() {
        let creds = credentials();
        creds
            .put_session(&Session {
                access_token: "T".into(),
                expires_at: 1_700_000_000_000,
            })
            .await
            .unwrap();

        let raw = creds.store().get(KEY_SESSION).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["access_token"], "T");
        assert_eq!(value["expires_at"], 1_700_000_000_000i64);
    }

    #[tokio::test]
    async fn test_reset_clears_both_slots() {
        let creds = credentials();
        creds.save_verifier("v").await.unwrap();
        creds.save_session("T", 60).await.unwrap();

        creds.reset().await.unwrap();
        assert_eq!(creds.load_verifier().await.unwrap(), None);
        assert_eq!(creds.load_session().await.unwrap(), None);
    }
}
