use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::types::CallbackParams;

/// Captures the redirect parameters for the waiting authentication flow.
///
/// The exchange itself happens in the authenticator; this handler only records
/// what the authorization server sent back.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<CallbackParams>>>>,
) -> Html<&'static str> {
    let page = if params.contains_key("code") {
        Html("<h2>Authorization received.</h2><p>Close this browser window and return to the terminal.</p>")
    } else if params.contains_key("error") {
        Html("<h4>Authorization was denied.</h4>")
    } else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    *shared_state.lock().await = Some(params);
    page
}
