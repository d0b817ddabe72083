//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::WebhooksConfig;
use crate::db::WebhookStore;
use crate::shopify::WebhookVerifier;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The store is passed explicitly to every
/// handler through this state; there is no global connection.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebhooksConfig,
    store: Arc<dyn WebhookStore>,
    verifier: WebhookVerifier,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The signature verifier is keyed with `config.webhook_secret`.
    #[must_use]
    pub fn new(config: WebhooksConfig, store: Arc<dyn WebhookStore>) -> Self {
        let verifier = WebhookVerifier::new(config.webhook_secret.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                verifier,
            }),
        }
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &WebhooksConfig {
        &self.inner.config
    }

    /// Get a reference to the persistence store.
    #[must_use]
    pub fn store(&self) -> &dyn WebhookStore {
        self.inner.store.as_ref()
    }

    /// Get a reference to the webhook signature verifier.
    #[must_use]
    pub fn verifier(&self) -> &WebhookVerifier {
        &self.inner.verifier
    }
}
