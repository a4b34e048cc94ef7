use crate::{
    spotify::SpotifyApi,
    types::{SearchResponse, Track, TrackPage},
    warning,
};

pub const SEARCH_LIMIT: u32 = 10;

/// Searches the catalog for tracks matching `term`.
///
/// An empty term short-circuits without a request. Non-2xx responses, transport
/// failures and bodies without `tracks.items` all yield an empty list; 401, 403
/// and 429 are reported through the notifier first.
///
/// # Arguments
///
/// * `api` - Client, base URL and notifier
/// * `term` - Free text; escaped into the `q` query parameter
/// * `token` - Bearer access token
///
/// # Returns
///
/// At most [`SEARCH_LIMIT`] tracks in the order the server returned them.
/// Items that are null or lack required fields are skipped.
///
/// # Example
///
/// ```
/// let tracks = search_tracks(&api, "daft punk", &session.access_token).await;
/// println!("{}", Table::new(utils::build_track_rows(&tracks)));
/// ```
pub async fn search_tracks(api: &SpotifyApi, term: &str, token: &str) -> Vec<Track> {
    if term.trim().is_empty() {
        return Vec::new();
    }

    match fetch_tracks(api, term, token).await {
        Ok(tracks) => tracks,
        Err(e) => {
            warning!("Search request failed: {}", e);
            Vec::new()
        }
    }
}

async fn fetch_tracks(
    api: &SpotifyApi,
    term: &str,
    token: &str,
) -> Result<Vec<Track>, reqwest::Error> {
    let limit = SEARCH_LIMIT.to_string();
    let response = api
        .http
        .get(api.endpoint("search"))
        .query(&[("q", term), ("type", "track"), ("limit", limit.as_str())])
        .bearer_auth(token)
        .send()
        .await?;

    let status = response.status();
    api.notify(status);
    if !status.is_success() {
        return Ok(Vec::new());
    }

    let json = response.json::<SearchResponse>().await?;
    Ok(json.tracks.map(TrackPage::into_tracks).unwrap_or_default())
}
