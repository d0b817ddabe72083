//! In-memory implementation of [`WebhookStore`].
//!
//! All state lives behind a single `tokio::sync::RwLock`, so every write is
//! applied atomically with respect to other requests. Nothing survives a
//! restart. Used for local development and for exercising the handlers in
//! tests without a database.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use shopsync_core::{CustomerId, ShopId, ShopifyId, TagId, TagName};

use super::{StoreCounts, StoreError, StoreResult, WebhookStore};
use crate::models::{Customer, CustomerDetails, Shop, ShopDetails};

#[derive(Debug, Default)]
struct State {
    customers: HashMap<ShopifyId, Customer>,
    shops: HashMap<ShopifyId, Shop>,
    /// Tag id -> stored spelling.
    tags: HashMap<TagId, String>,
    /// Lowercased name -> tag id.
    tag_index: HashMap<String, TagId>,
    links: BTreeSet<(CustomerId, TagId)>,
    next_customer_id: i32,
    next_shop_id: i32,
    next_tag_id: i32,
}

impl State {
    fn tag_id_for(&mut self, tag: &TagName) -> TagId {
        let key = tag.normalized();
        if let Some(id) = self.tag_index.get(&key) {
            return *id;
        }
        self.next_tag_id += 1;
        let id = TagId::new(self.next_tag_id);
        self.tags.insert(id, tag.as_str().to_owned());
        self.tag_index.insert(key, id);
        id
    }

    fn insert_customer(&mut self, shopify_id: ShopifyId, details: &CustomerDetails) -> Customer {
        self.next_customer_id += 1;
        let now = Utc::now();
        let customer = Customer {
            id: CustomerId::new(self.next_customer_id),
            shopify_id,
            details: details.clone(),
            created_at: now,
            updated_at: now,
        };
        self.customers.insert(shopify_id, customer.clone());
        customer
    }

    fn replace_links(&mut self, customer_id: CustomerId, tags: &[TagName]) {
        self.links.retain(|(c, _)| *c != customer_id);
        for tag in tags {
            let tag_id = self.tag_id_for(tag);
            self.links.insert((customer_id, tag_id));
        }
    }
}

/// Non-durable [`WebhookStore`] backed by hash maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WebhookStore for MemoryStore {
    async fn upsert_customer(
        &self,
        shopify_id: ShopifyId,
        details: &CustomerDetails,
        tags: Option<&[TagName]>,
    ) -> StoreResult<Customer> {
        let mut state = self.state.write().await;

        let customer = match state.customers.get_mut(&shopify_id) {
            Some(existing) => {
                existing.details = details.clone();
                existing.updated_at = Utc::now();
                existing.clone()
            }
            None => state.insert_customer(shopify_id, details),
        };

        if let Some(tags) = tags {
            state.replace_links(customer.id, tags);
        }

        Ok(customer)
    }

    async fn apply_customer_state(
        &self,
        shopify_id: ShopifyId,
        details: &CustomerDetails,
    ) -> StoreResult<Customer> {
        let mut state = self.state.write().await;

        if let Some(existing) = state.customers.get_mut(&shopify_id) {
            existing.details.state = details.state;
            existing.updated_at = Utc::now();
            return Ok(existing.clone());
        }

        Ok(state.insert_customer(shopify_id, details))
    }

    async fn delete_customer(&self, shopify_id: ShopifyId) -> StoreResult<bool> {
        let mut state = self.state.write().await;

        let Some(customer) = state.customers.remove(&shopify_id) else {
            return Ok(false);
        };
        state.links.retain(|(c, _)| *c != customer.id);
        Ok(true)
    }

    async fn upsert_shop(
        &self,
        shopify_id: ShopifyId,
        details: &ShopDetails,
    ) -> StoreResult<Shop> {
        let mut state = self.state.write().await;

        if let Some(existing) = state.shops.get_mut(&shopify_id) {
            existing.details = details.clone();
            existing.updated_at = Utc::now();
            return Ok(existing.clone());
        }

        state.next_shop_id += 1;
        let now = Utc::now();
        let shop = Shop {
            id: ShopId::new(state.next_shop_id),
            shopify_id,
            details: details.clone(),
            created_at: now,
            updated_at: now,
        };
        state.shops.insert(shopify_id, shop.clone());
        Ok(shop)
    }

    async fn customer_by_shopify_id(
        &self,
        shopify_id: ShopifyId,
    ) -> StoreResult<Option<Customer>> {
        Ok(self.state.read().await.customers.get(&shopify_id).cloned())
    }

    async fn customer_tags(&self, shopify_id: ShopifyId) -> StoreResult<Vec<String>> {
        let state = self.state.read().await;

        let Some(customer) = state.customers.get(&shopify_id) else {
            return Ok(Vec::new());
        };

        let mut names = state
            .links
            .iter()
            .filter(|(c, _)| *c == customer.id)
            .map(|(_, tag_id)| {
                state.tags.get(tag_id).cloned().ok_or_else(|| {
                    StoreError::DataCorruption(format!("link to missing tag {tag_id}"))
                })
            })
            .collect::<StoreResult<Vec<_>>>()?;
        // Byte order, matching `COLLATE "C"` in Postgres.
        names.sort();
        Ok(names)
    }

    async fn shop_by_shopify_id(&self, shopify_id: ShopifyId) -> StoreResult<Option<Shop>> {
        Ok(self.state.read().await.shops.get(&shopify_id).cloned())
    }

    async fn counts(&self) -> StoreResult<StoreCounts> {
        let state = self.state.read().await;
        let len = |n: usize| i64::try_from(n).unwrap_or(i64::MAX);
        Ok(StoreCounts {
            customers: len(state.customers.len()),
            shops: len(state.shops.len()),
            tags: len(state.tags.len()),
            customer_tags: len(state.links.len()),
        })
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
