//! # API Module
//!
//! HTTP endpoints served by the short-lived local callback server while the
//! authorization redirect is in flight.
//!
//! - [`callback`] - Receives the redirect from the authorization server and hands
//!   its query parameters to the waiting authentication flow.
//! - [`health`] - Returns application status and version.
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use jammcli::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
