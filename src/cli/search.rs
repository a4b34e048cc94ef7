use tabled::Table;

use crate::{cli::Context, info, spotify, utils, warning};

pub async fn search(ctx: &Context, term: String) {
    if term.trim().is_empty() {
        info!("Nothing to search for.");
        return;
    }

    let Some(token) = ctx.require_token().await else {
        return;
    };

    let pb = super::spinner(&format!("Searching for \"{}\"...", term));
    let tracks = spotify::search::search_tracks(&ctx.api, &term, &token).await;
    pb.finish_and_clear();
    ctx.invalidate_if_unauthorized().await;

    if tracks.is_empty() {
        info!("No tracks found for \"{}\".", term);
        return;
    }

    if let Err(e) = ctx.storage.drafts.remember_results(&tracks).await {
        warning!("Failed to remember search results: {}", e);
    }

    println!("{}", Table::new(utils::build_track_rows(&tracks)));
    info!("Add tracks to the draft with `jammcli draft add <#>...`");
}
