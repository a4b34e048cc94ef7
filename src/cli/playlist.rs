use crate::{
    cli::Context, error, error::PlaylistError, info, spotify, success, warning,
};

/// Saves the draft as a new public playlist.
///
/// The draft survives authentication failures. Once the save request has been
/// issued the draft is cleared whatever the outcome.
pub async fn save(ctx: &Context, name: Option<String>) {
    let mut draft = match ctx.storage.drafts.load().await {
        Ok(draft) => draft,
        Err(e) => error!("Cannot read playlist draft: {}", e),
    };

    if draft.is_empty() {
        warning!("The draft is empty. Add tracks with `jammcli draft add <#>...` first.");
        return;
    }

    if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
        draft.name = name;
    }

    let Some(token) = ctx.require_token().await else {
        return;
    };

    info!("Saving \"{}\" with {} track(s)...", draft.name, draft.tracks.len());
    let pb = super::spinner("Creating playlist...");
    let result =
        spotify::playlist::create_playlist(&ctx.api, &draft.name, &draft.uris(), &token).await;
    pb.finish_and_clear();

    if let Err(e) = ctx.storage.drafts.clear().await {
        warning!("Failed to clear draft: {}", e);
    }
    ctx.invalidate_if_unauthorized().await;

    match result {
        Ok(playlist_id) => success!("Playlist \"{}\" saved (id {}).", draft.name, playlist_id),
        Err(e @ PlaylistError::ItemsNotAdded { .. }) => {
            warning!("{}. The empty playlist was left in place.", e)
        }
        Err(e) => warning!("Failed to save playlist: {}", e),
    }
}
