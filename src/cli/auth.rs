use chrono::Utc;

use crate::{
    cli::{Context, Storage, format_expiry},
    info,
    spotify::auth::{Location, SessionOutcome},
    success, warning,
};

pub async fn auth(ctx: &Context) {
    let mut location = Location::none();
    match ctx.authenticator.ensure_session(&mut location).await {
        SessionOutcome::Ready(session) => info!(
            "Already authenticated. Session valid until {}.",
            format_expiry(session.expires_at)
        ),
        SessionOutcome::NeedsRedirect(url) => {
            ctx.complete_redirect(&url).await;
        }
        SessionOutcome::Failed(e) => {
            warning!("Authentication failed: {}", e);
            if let Err(e) = ctx.credentials().reset().await {
                warning!("Failed to clear local token state: {}", e);
            }
            warning!("Local token state was cleared. Please retry from the start.");
        }
    }
}

pub async fn logout(storage: &Storage) {
    match storage.credentials.reset().await {
        Ok(()) => success!("Local session removed."),
        Err(e) => warning!("Failed to remove local session: {}", e),
    }
}

pub async fn status(storage: &Storage) {
    match storage.credentials.load_session().await {
        Ok(Some(session)) if session.is_valid_at(Utc::now().timestamp_millis()) => success!(
            "Authenticated. Session valid until {}.",
            format_expiry(session.expires_at)
        ),
        Ok(Some(session)) => warning!(
            "Session expired at {}. Run `jammcli auth` to sign in again.",
            format_expiry(session.expires_at)
        ),
        Ok(None) => info!("Not authenticated. Run `jammcli auth` to sign in."),
        Err(e) => warning!("Cannot read stored session: {}", e),
    }
}
