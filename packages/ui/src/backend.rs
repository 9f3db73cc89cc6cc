//! Handles to the hosted backend, shared through context.
//!
//! Provided once at the app root as a `Signal<Backend>` so event handlers can copy
//! the handle freely; both clients are cheap to clone.
//!
//! Reads and writes go through [`Backend::fresh_store`], which renews a nearly
//! expired access token first. The renewed token reaches the store through the
//! session listener in [`AuthProvider`](crate::AuthProvider).

use api::AuthClient;
use chrono::Utc;
use dioxus::prelude::*;
use store::{FolioConfig, RestStore};

#[derive(Clone, Debug)]
pub struct Backend {
    pub store: RestStore,
    pub auth: AuthClient,
    pub config: FolioConfig,
}

impl Backend {
    pub fn new(config: FolioConfig) -> Self {
        if !config.is_connected() {
            tracing::warn!("no backend configured; set FOLIO_REMOTE_URL and FOLIO_ANON_KEY");
        }
        Self {
            store: RestStore::new(&config.remote),
            auth: AuthClient::new(&config.remote),
            config,
        }
    }

    /// The row store, after renewing the signed-in session if its token is about
    /// to expire. A failed renewal signs the user out and the request goes ahead
    /// with the anonymous key.
    pub async fn fresh_store(&self) -> RestStore {
        if let Err(e) = self.auth.ensure_fresh(Utc::now()).await {
            tracing::warn!("session could not be renewed: {e}");
        }
        self.store.clone()
    }
}

/// Consume the `Signal<Backend>` from context.
pub fn use_backend() -> Signal<Backend> {
    use_context::<Signal<Backend>>()
}
