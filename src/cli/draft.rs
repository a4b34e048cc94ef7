use tabled::Table;

use crate::{
    cli::Storage, error, info, success, types::PlaylistDraft, utils, warning,
};

async fn load(storage: &Storage) -> PlaylistDraft {
    match storage.drafts.load().await {
        Ok(draft) => draft,
        Err(e) => error!("Cannot read playlist draft: {}", e),
    }
}

async fn persist(storage: &Storage, draft: &PlaylistDraft) -> bool {
    match storage.drafts.persist(draft).await {
        Ok(()) => true,
        Err(e) => {
            warning!("Failed to save playlist draft: {}", e);
            false
        }
    }
}

pub async fn show_draft(storage: &Storage) {
    let draft = load(storage).await;
    info!("Draft \"{}\" ({} tracks)", draft.name, draft.tracks.len());
    if !draft.is_empty() {
        println!("{}", Table::new(utils::build_track_rows(&draft.tracks)));
    }
}

/// Appends tracks picked by their number in the last search.
pub async fn add_to_draft(storage: &Storage, picks: Vec<usize>) {
    let results = match storage.drafts.last_results().await {
        Ok(results) => results,
        Err(e) => error!("Cannot read last search results: {}", e),
    };

    if results.is_empty() {
        warning!("No search results to pick from. Run `jammcli search <term>` first.");
        return;
    }

    let (tracks, invalid) = utils::pick_tracks(&results, &picks);
    for pick in invalid {
        warning!("No search result #{}", pick);
    }

    let mut draft = load(storage).await;
    let mut added = 0;
    for track in tracks {
        let name = track.name.clone();
        if draft.add(track) {
            added += 1;
        } else {
            warning!("\"{}\" is already in the draft", name);
        }
    }

    if added > 0 && persist(storage, &draft).await {
        success!("Added {} track(s) to \"{}\".", added, draft.name);
    }
}

/// Removes tracks by their number in the draft.
pub async fn remove_from_draft(storage: &Storage, picks: Vec<usize>) {
    let mut draft = load(storage).await;
    let (tracks, invalid) = utils::pick_tracks(&draft.tracks, &picks);
    for pick in invalid {
        warning!("No draft entry #{}", pick);
    }

    let removed = tracks.iter().filter(|t| draft.remove(&t.id)).count();
    if removed > 0 && persist(storage, &draft).await {
        success!("Removed {} track(s) from \"{}\".", removed, draft.name);
    }
}

pub async fn rename_draft(storage: &Storage, name: String) {
    if name.trim().is_empty() {
        warning!("Playlist name cannot be empty.");
        return;
    }

    let mut draft = load(storage).await;
    draft.name = name;
    if persist(storage, &draft).await {
        success!("Draft renamed to \"{}\".", draft.name);
    }
}

pub async fn clear_draft(storage: &Storage) {
    match storage.drafts.clear().await {
        Ok(()) => success!("Draft cleared."),
        Err(e) => warning!("Failed to clear draft: {}", e),
    }
}
