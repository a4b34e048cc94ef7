use std::sync::Arc;

use crate::{
    error::StoreError,
    management::KeyValueStore,
    types::{PlaylistDraft, Track},
};

pub const KEY_DRAFT: &str = "playlist_draft";
pub const KEY_LAST_SEARCH: &str = "last_search";

/// Keeps the playlist draft and the most recent search results between runs.
pub struct DraftManager<S> {
    store: Arc<S>,
}

impl<S: KeyValueStore> DraftManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Result<PlaylistDraft, StoreError> {
        match self.store.get(KEY_DRAFT).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(PlaylistDraft::default()),
        }
    }

    pub async fn persist(&self, draft: &PlaylistDraft) -> Result<(), StoreError> {
        let json = serde_json::to_string(draft)?;
        self.store.set(KEY_DRAFT, &json).await
    }

    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.delete(KEY_DRAFT).await
    }

    /// Replaces the remembered search results; the latest completed search wins.
    pub async fn remember_results(&self, tracks: &[Track]) -> Result<(), StoreError> {
        let json = serde_json::to_string(tracks)?;
        self.store.set(KEY_LAST_SEARCH, &json).await
    }

    pub async fn last_results(&self) -> Result<Vec<Track>, StoreError> {
        match self.store.get(KEY_LAST_SEARCH).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }
}
