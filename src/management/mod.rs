mod auth;
mod draft;
mod store;

pub use auth::CredentialStore;
pub use auth::KEY_CODE_VERIFIER;
pub use auth::KEY_SESSION;
pub use draft::DraftManager;
pub use draft::KEY_DRAFT;
pub use draft::KEY_LAST_SEARCH;
pub use store::FileStore;
pub use store::KeyValueStore;
pub use store::MemoryStore;
