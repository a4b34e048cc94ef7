#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use jammcli::{
    config::Config,
    management::{CredentialStore, MemoryStore},
    spotify::{ApiErrorClass, Notifier, SpotifyApi, auth::Authenticator},
};
use serde_json::{Value, json};
use wiremock::MockServer;

pub const REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";

/// Collects notifications instead of printing them.
#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<ApiErrorClass>>,
}

impl RecordingNotifier {
    pub fn seen(&self) -> Vec<ApiErrorClass> {
        self.seen.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, class: ApiErrorClass) {
        self.seen.lock().unwrap().push(class);
    }
}

pub fn config_for(server: &MockServer) -> Config {
    Config::new("client-123", REDIRECT_URI)
        .with_auth_url(format!("{}/authorize", server.uri()))
        .with_token_url(format!("{}/api/token", server.uri()))
        .with_api_url(server.uri())
}

pub fn authenticator_for(
    server: &MockServer,
) -> (Authenticator<MemoryStore>, CredentialStore<MemoryStore>) {
    let credentials = CredentialStore::new(Arc::new(MemoryStore::new()));
    let authenticator = Authenticator::new(&config_for(server), credentials.clone());
    (authenticator, credentials)
}

pub fn api_for(server: &MockServer) -> (SpotifyApi, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let api = SpotifyApi::new(server.uri(), notifier.clone());
    (api, notifier)
}

pub fn raw_track(id: &str, name: &str, album: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "artists": [{ "id": format!("{id}-artist"), "name": format!("{name} Artist") }],
        "album": { "id": format!("{id}-album"), "name": album, "album_type": "album" },
        "uri": format!("spotify:track:{id}"),
        "duration_ms": 200000,
        "popularity": 50
    })
}

pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or_default()
}
