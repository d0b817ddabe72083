//! Integration tests for shopsync.
//!
//! # Running Tests
//!
//! ```bash
//! # HTTP tests (in-memory store, no services needed)
//! cargo test -p shopsync-integration-tests
//!
//! # Postgres store tests
//! DATABASE_URL=postgres://localhost/shopsync_test \
//!     cargo test -p shopsync-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `webhook_routes` - Signed deliveries through the full router
//! - `postgres_store` - `PostgresStore` against a real database
//!
//! This crate's library holds the shared harness: a router wired to a
//! [`MemoryStore`] plus helpers that sign bodies the way Shopify does.

#![allow(clippy::unwrap_used)]

pub mod fixtures;

use std::collections::HashSet;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use secrecy::SecretString;
use tower::ServiceExt;

use shopsync_core::SiteId;
use shopsync_webhooks::config::{StoreBackend, WebhooksConfig};
use shopsync_webhooks::db::MemoryStore;
use shopsync_webhooks::routes;
use shopsync_webhooks::shopify::{HMAC_HEADER, TOPIC_HEADER, Topic, WebhookVerifier};
use shopsync_webhooks::state::AppState;

/// Webhook secret used by every test app.
pub const TEST_SECRET: &str = "4f1c9a7e2b8d6035e1a9c7f4b2d8e60a";

/// Site id used by the Shopify sample requests.
pub const TEST_SITE: &str = "abcd";

/// Configuration for an in-memory receiver.
#[must_use]
pub fn test_config() -> WebhooksConfig {
    WebhooksConfig {
        database_url: None,
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        store: StoreBackend::Memory,
        webhook_secret: SecretString::from(TEST_SECRET),
        allowed_sites: None,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Response status and body text.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
}

/// The full router over a fresh [`MemoryStore`].
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    router: Router,
    verifier: WebhookVerifier,
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Only accept deliveries for `sites`.
    #[must_use]
    pub fn with_sites(sites: &[&str]) -> Self {
        let mut config = test_config();
        config.allowed_sites = Some(
            sites
                .iter()
                .map(|s| SiteId::parse(s).unwrap())
                .collect::<HashSet<_>>(),
        );
        Self::with_config(config)
    }

    fn with_config(config: WebhooksConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(config, store.clone());

        Self {
            store,
            router: routes::app(state),
            verifier: WebhookVerifier::new(SecretString::from(TEST_SECRET)),
        }
    }

    /// POST a correctly signed `body` to `/webhooks/shopify/{site}/{event}`,
    /// with the `X-Shopify-Topic` header Shopify would send for `event`.
    pub async fn deliver(&self, site: &str, event: &str, body: &serde_json::Value) -> TestResponse {
        let bytes = serde_json::to_vec(body).unwrap();
        let signature = self.verifier.sign(&bytes).unwrap();

        let mut request = Request::post(format!("/webhooks/shopify/{site}/{event}"))
            .header("content-type", "application/json")
            .header(HMAC_HEADER, signature);
        if let Ok(topic) = event.parse::<Topic>() {
            request = request.header(TOPIC_HEADER, topic.shopify_topic());
        }

        self.send(request.body(Body::from(bytes)).unwrap()).await
    }

    /// POST raw bytes with an optional signature header.
    pub async fn post(&self, uri: &str, body: Vec<u8>, signature: Option<&str>) -> TestResponse {
        let mut request = Request::post(uri).header("content-type", "application/json");
        if let Some(signature) = signature {
            request = request.header(HMAC_HEADER, signature);
        }

        self.send(request.body(Body::from(body)).unwrap()).await
    }

    /// GET `uri`.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    /// Sign `body` with the test secret.
    #[must_use]
    pub fn sign(&self, body: &[u8]) -> String {
        self.verifier.sign(body).unwrap()
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
