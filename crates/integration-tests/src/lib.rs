//! Integration tests for Herbal Glow.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p herbal-glow-integration-tests
//! ```
//!
//! Tests drive the full storefront router against the in-memory credential
//! store, either in-process through `tower::ServiceExt::oneshot` or over a
//! real socket with a cookie-keeping `reqwest` client.

use axum::Router;
use tower_sessions::MemoryStore;

use herbal_glow_storefront::config::{StoreBackendConfig, StorefrontConfig};
use herbal_glow_storefront::db::UserBackend;
use herbal_glow_storefront::state::{AppState, load_recommendations};

/// A storefront over a fresh memory store.
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    /// Build the app with default configuration and the built-in rule table.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration or built-in table is invalid.
    pub async fn new() -> Self {
        let mut config = StorefrontConfig::from_lookup(|_| None).expect("default config is valid");
        config.store = StoreBackendConfig::Memory;

        let recommendations = load_recommendations(None)
            .await
            .expect("built-in rule table is valid");

        let state = AppState::new(config, UserBackend::memory(), recommendations);
        let router = herbal_glow_storefront::app(state.clone(), MemoryStore::default());
        Self { state, router }
    }

    /// Serve the app on an ephemeral local port and return its base URL.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn spawn(self) -> (String, AppState) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("listener has an address");

        let router = self.router;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        (format!("http://{addr}"), self.state)
    }
}
