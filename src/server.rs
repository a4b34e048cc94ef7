use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{api, types::CallbackParams};

pub fn router(state: Arc<Mutex<Option<CallbackParams>>>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)))
}

/// Serves the callback router on an already bound listener.
pub async fn serve(
    listener: TcpListener,
    state: Arc<Mutex<Option<CallbackParams>>>,
) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}
