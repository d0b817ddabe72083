//! Webhook synchronization.
//!
//! Each function maps one event onto the store and reports what happened.
//! None of them fail on test deliveries, repeated deliveries or deletes of
//! unknown ids; only store failures are errors.

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use shopsync_core::{CustomerState, ShopifyId, parse_tag_list};

use crate::db::{StoreError, StoreResult, WebhookStore};
use crate::shopify::{CustomerDeletePayload, CustomerPayload, ShopPayload, Topic};

/// What a webhook did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// `id` was null; nothing was written.
    TestPayload,
    /// The record was inserted or overwritten.
    Upserted(ShopifyId),
    /// A customer state change was applied (inserting the customer if new).
    StateApplied(ShopifyId, CustomerState),
    /// The customer existed and was removed.
    Deleted(ShopifyId),
    /// The customer to delete was not stored.
    AlreadyAbsent(ShopifyId),
}

impl SyncOutcome {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TestPayload => "test_payload",
            Self::Upserted(_) => "upserted",
            Self::StateApplied(..) => "state_applied",
            Self::Deleted(_) => "deleted",
            Self::AlreadyAbsent(_) => "already_absent",
        }
    }

    /// Whether the store was changed.
    #[must_use]
    pub const fn wrote(&self) -> bool {
        !matches!(self, Self::TestPayload | Self::AlreadyAbsent(_))
    }
}

impl std::fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `customers/create`.
///
/// Shopify re-sends create events for customers added through the admin,
/// so an existing id is overwritten rather than rejected.
///
/// # Errors
///
/// Returns `StoreError` if the write fails.
pub async fn create_customer(
    store: &dyn WebhookStore,
    payload: &CustomerPayload,
) -> StoreResult<SyncOutcome> {
    upsert_customer(store, payload).await
}

/// `customers/update`.
///
/// Overwrites every copied field and, when `tags` is present, replaces the
/// customer's tag links with exactly the listed tags.
///
/// # Errors
///
/// Returns `StoreError` if the write fails.
pub async fn update_customer(
    store: &dyn WebhookStore,
    payload: &CustomerPayload,
) -> StoreResult<SyncOutcome> {
    upsert_customer(store, payload).await
}

#[instrument(skip_all, fields(shopify_id = ?payload.id))]
async fn upsert_customer(
    store: &dyn WebhookStore,
    payload: &CustomerPayload,
) -> StoreResult<SyncOutcome> {
    let Some(shopify_id) = payload.id else {
        return Ok(test_payload());
    };

    let tags = payload.tags.as_deref().map(parse_tag_list);
    let customer = store
        .upsert_customer(shopify_id, &payload.details(), tags.as_deref())
        .await?;

    tracing::info!(
        %shopify_id,
        customer_id = %customer.id,
        tags = tags.as_ref().map(Vec::len),
        outcome = "upserted",
        "Customer synced"
    );
    Ok(SyncOutcome::Upserted(shopify_id))
}

/// `customers/enable`. Forces the state to `enabled`.
///
/// # Errors
///
/// Returns `StoreError` if the write fails.
pub async fn enable_customer(
    store: &dyn WebhookStore,
    payload: &CustomerPayload,
) -> StoreResult<SyncOutcome> {
    set_customer_state(store, payload, CustomerState::Enabled).await
}

/// `customers/disable`. Forces the state to `disabled`.
///
/// # Errors
///
/// Returns `StoreError` if the write fails.
pub async fn disable_customer(
    store: &dyn WebhookStore,
    payload: &CustomerPayload,
) -> StoreResult<SyncOutcome> {
    set_customer_state(store, payload, CustomerState::Disabled).await
}

/// The target state comes from the event, not from the payload's `state`,
/// which Shopify does not always keep consistent with the event.
#[instrument(skip_all, fields(shopify_id = ?payload.id, state = %target))]
async fn set_customer_state(
    store: &dyn WebhookStore,
    payload: &CustomerPayload,
    target: CustomerState,
) -> StoreResult<SyncOutcome> {
    let Some(shopify_id) = payload.id else {
        return Ok(test_payload());
    };

    let mut details = payload.details();
    details.state = target;

    let customer = store.apply_customer_state(shopify_id, &details).await?;

    tracing::info!(
        %shopify_id,
        customer_id = %customer.id,
        state = %target,
        outcome = "state_applied",
        "Customer state synced"
    );
    Ok(SyncOutcome::StateApplied(shopify_id, target))
}

/// `customers/delete`. Deleting an unknown id succeeds.
///
/// # Errors
///
/// Returns `StoreError` if the delete fails.
#[instrument(skip_all, fields(shopify_id = ?payload.id))]
pub async fn delete_customer(
    store: &dyn WebhookStore,
    payload: &CustomerDeletePayload,
) -> StoreResult<SyncOutcome> {
    let Some(shopify_id) = payload.id else {
        return Ok(test_payload());
    };

    let outcome = if store.delete_customer(shopify_id).await? {
        SyncOutcome::Deleted(shopify_id)
    } else {
        SyncOutcome::AlreadyAbsent(shopify_id)
    };

    tracing::info!(%shopify_id, %outcome, "Customer delete processed");
    Ok(outcome)
}

/// `shop/update`. Creates the shop on first sight.
///
/// # Errors
///
/// Returns `StoreError` if the write fails.
#[instrument(skip_all, fields(shopify_id = ?payload.id))]
pub async fn update_shop(
    store: &dyn WebhookStore,
    payload: &ShopPayload,
) -> StoreResult<SyncOutcome> {
    let Some(shopify_id) = payload.id else {
        return Ok(test_payload());
    };

    let shop = store.upsert_shop(shopify_id, &payload.details).await?;

    tracing::info!(
        %shopify_id,
        shop_id = %shop.id,
        outcome = "upserted",
        "Shop synced"
    );
    Ok(SyncOutcome::Upserted(shopify_id))
}

fn test_payload() -> SyncOutcome {
    tracing::info!(outcome = "test_payload", "Test delivery acknowledged, nothing stored");
    SyncOutcome::TestPayload
}

/// Errors from [`apply`].
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("invalid {topic} payload: {source}")]
    Payload {
        topic: Topic,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Parse a raw body for `topic` and apply it.
///
/// Used to replay saved deliveries outside the HTTP server.
///
/// # Errors
///
/// Returns `ApplyError::Payload` if the body does not match the topic's
/// schema and `ApplyError::Store` if the write fails.
pub async fn apply(
    store: &dyn WebhookStore,
    topic: Topic,
    body: &[u8],
) -> Result<SyncOutcome, ApplyError> {
    let outcome = match topic {
        Topic::CustomerCreate => create_customer(store, &parse(topic, body)?).await?,
        Topic::CustomerUpdate => update_customer(store, &parse(topic, body)?).await?,
        Topic::CustomerEnable => enable_customer(store, &parse(topic, body)?).await?,
        Topic::CustomerDisable => disable_customer(store, &parse(topic, body)?).await?,
        Topic::CustomerDelete => delete_customer(store, &parse(topic, body)?).await?,
        Topic::ShopUpdate => update_shop(store, &parse(topic, body)?).await?,
    };

    Ok(outcome)
}

fn parse<T: DeserializeOwned>(topic: Topic, body: &[u8]) -> Result<T, ApplyError> {
    serde_json::from_slice(body).map_err(|source| ApplyError::Payload { topic, source })
}
