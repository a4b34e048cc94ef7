use crate::{
    error::PlaylistError,
    spotify::SpotifyApi,
    types::{AddItemsRequest, CreatePlaylistRequest, CreatePlaylistResponse},
    warning,
};

/// Creates a public playlist named `name` and fills it with `track_uris`.
///
/// Returns the new playlist id. An empty URI list is rejected before any request.
/// If creation succeeds but adding the items fails, the playlist stays behind
/// empty and [`PlaylistError::ItemsNotAdded`] names it.
///
/// # Arguments
///
/// * `api` - Client, base URL and notifier
/// * `name` - Playlist name, sent as is
/// * `track_uris` - Track URIs in the order they should appear
/// * `token` - Bearer access token
///
/// # Errors
///
/// - [`PlaylistError::EmptyTrackList`] before any request is made
/// - [`PlaylistError::CreateFailed`] when creation is rejected; nothing was added
/// - [`PlaylistError::MissingPlaylistId`] when the create response has no id
/// - [`PlaylistError::ItemsNotAdded`] when only the second step failed
///
/// # Example
///
/// ```
/// let id = create_playlist(&api, &draft.name, &draft.uris(), &token).await?;
/// success!("Playlist saved (id {})", id);
/// ```
pub async fn create_playlist(
    api: &SpotifyApi,
    name: &str,
    track_uris: &[String],
    token: &str,
) -> Result<String, PlaylistError> {
    if track_uris.is_empty() {
        return Err(PlaylistError::EmptyTrackList);
    }

    let response = api
        .http
        .post(api.endpoint("me/playlists"))
        .bearer_auth(token)
        .json(&CreatePlaylistRequest {
            name: name.to_string(),
            public: true,
        })
        .send()
        .await?;

    let status = response.status();
    api.notify(status);
    if !status.is_success() {
        return Err(PlaylistError::CreateFailed { status });
    }

    let created = response.json::<CreatePlaylistResponse>().await?;
    let playlist_id = created
        .id
        .filter(|id| !id.is_empty())
        .ok_or(PlaylistError::MissingPlaylistId)?;

    add_items(api, &playlist_id, track_uris, token).await?;
    Ok(playlist_id)
}

/// Inserts all `uris` at position 0 of the playlist in one request.
pub async fn add_items(
    api: &SpotifyApi,
    playlist_id: &str,
    uris: &[String],
    token: &str,
) -> Result<(), PlaylistError> {
    let not_added = |status| PlaylistError::ItemsNotAdded {
        playlist_id: playlist_id.to_string(),
        status,
    };

    let response = api
        .http
        .post(api.endpoint(&format!("playlists/{playlist_id}/items")))
        .bearer_auth(token)
        .json(&AddItemsRequest {
            uris: uris.to_vec(),
            position: 0,
        })
        .send()
        .await;

    let response = match response {
        Ok(resp) => resp,
        Err(e) => {
            warning!("Add items request failed: {}", e);
            return Err(not_added(None));
        }
    };

    let status = response.status();
    api.notify(status);
    if !status.is_success() {
        return Err(not_added(Some(status)));
    }

    Ok(())
}
