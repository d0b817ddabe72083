//! Persistence for synchronized Shopify records.
//!
//! # Schema: `webhooks`
//!
//! - `customer` - one row per Shopify customer, keyed by `shopify_id`
//! - `tag` - global tag vocabulary, unique on `lower(name)`
//! - `customer_tag` - customer/tag links, cascading from both sides
//! - `shop` - one row per Shopify shop, keyed by `shopify_id`
//!
//! # Backends
//!
//! [`WebhookStore`] has two implementations: [`PostgresStore`] for
//! deployments and [`MemoryStore`] for local development and tests.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/webhooks/migrations/` and run via:
//! ```bash
//! cargo run -p shopsync-cli -- migrate
//! ```

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use shopsync_core::{ShopifyId, TagName};

use crate::models::{Customer, CustomerDetails, Shop, ShopDetails};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database query or connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored data failed an integrity check.
    #[error("Data corruption: {0}")]
    DataCorruption(String),

    /// A write collided with a constraint it should have resolved.
    #[error("Conflict: {0}")]
    Conflict(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Row counts across the schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub customers: i64,
    pub shops: i64,
    pub tags: i64,
    pub customer_tags: i64,
}

/// Storage used by the webhook handlers.
///
/// Every write is keyed by the Shopify id and is idempotent: applying the
/// same call twice leaves the same state as applying it once.
#[async_trait]
pub trait WebhookStore: Send + Sync {
    /// Insert or overwrite a customer.
    ///
    /// When `tags` is `Some`, the customer's tag links are replaced by
    /// exactly that set in the same transaction (missing tags are created).
    /// `None` leaves existing links untouched.
    async fn upsert_customer(
        &self,
        shopify_id: ShopifyId,
        details: &CustomerDetails,
        tags: Option<&[TagName]>,
    ) -> StoreResult<Customer>;

    /// Set the state of a customer.
    ///
    /// An existing row only has its `state` changed to `details.state`.
    /// A missing customer is created from `details`.
    async fn apply_customer_state(
        &self,
        shopify_id: ShopifyId,
        details: &CustomerDetails,
    ) -> StoreResult<Customer>;

    /// Delete a customer and its tag links. Returns `false` if it did not exist.
    async fn delete_customer(&self, shopify_id: ShopifyId) -> StoreResult<bool>;

    /// Insert or overwrite a shop.
    async fn upsert_shop(&self, shopify_id: ShopifyId, details: &ShopDetails)
    -> StoreResult<Shop>;

    async fn customer_by_shopify_id(&self, shopify_id: ShopifyId)
    -> StoreResult<Option<Customer>>;

    /// Tag names linked to a customer, sorted.
    async fn customer_tags(&self, shopify_id: ShopifyId) -> StoreResult<Vec<String>>;

    async fn shop_by_shopify_id(&self, shopify_id: ShopifyId) -> StoreResult<Option<Shop>>;

    async fn counts(&self) -> StoreResult<StoreCounts>;

    async fn health_check(&self) -> StoreResult<()>;
    fn backend_name(&self) -> &'static str;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
