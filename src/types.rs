use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

pub const DEFAULT_PLAYLIST_NAME: &str = "New Playlist";

/// Locally cached access token plus its absolute expiry in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub expires_at: i64,
}

impl Session {
    pub fn is_valid_at(&self, now_millis: i64) -> bool {
        now_millis < self.expires_at
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

/// Query parameters the authorization server sent back to the callback.
pub type CallbackParams = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub album: Album,
    pub uri: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub tracks: Option<TrackPage>,
}

/// Items stay raw so one malformed record cannot sink the whole page.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackPage {
    pub items: Option<Vec<Option<serde_json::Value>>>,
}

impl TrackPage {
    /// Maps each raw record on its own, skipping nulls and records without the
    /// fields a [`Track`] needs.
    pub fn into_tracks(self) -> Vec<Track> {
        self.items
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .filter_map(|raw| serde_json::from_value(raw).ok())
            .collect()
    }
}

#[derive(Tabled)]
pub struct TrackTableRow {
    #[tabled(rename = "#")]
    pub index: usize,
    pub name: String,
    pub artists: String,
    pub album: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub public: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddItemsRequest {
    pub uris: Vec<String>,
    pub position: u32,
}

/// Playlist being assembled between invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistDraft {
    pub name: String,
    pub tracks: Vec<Track>,
}

impl Default for PlaylistDraft {
    fn default() -> Self {
        Self {
            name: DEFAULT_PLAYLIST_NAME.to_string(),
            tracks: Vec::new(),
        }
    }
}

impl PlaylistDraft {
    /// Appends a track unless one with the same id is already present.
    pub fn add(&mut self, track: Track) -> bool {
        if self.has(&track.id) {
            return false;
        }
        self.tracks.push(track);
        true
    }

    pub fn remove(&mut self, track_id: &str) -> bool {
        let before = self.tracks.len();
        self.tracks.retain(|t| t.id != track_id);
        before != self.tracks.len()
    }

    pub fn has(&self, track_id: &str) -> bool {
        self.tracks.iter().any(|t| t.id == track_id)
    }

    pub fn uris(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.uri.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
