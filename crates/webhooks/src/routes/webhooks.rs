//! Shopify webhook handlers.
//!
//! Each handler verifies the delivery (via [`ShopifyWebhook`]), checks the
//! site against the allow-list, and hands the payload to the matching
//! sync service. Accepted deliveries get an empty `200 OK` whether or not
//! anything was written; Shopify retries anything else.

use std::future::Future;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::Instrument;

use shopsync_core::SiteId;

use crate::db::StoreResult;
use crate::error::{AppError, Result};
use crate::middleware::{ShopifyWebhook, WebhookMeta};
use crate::services::{SyncOutcome, sync};
use crate::shopify::{CustomerDeletePayload, CustomerPayload, ShopPayload, Topic};
use crate::state::AppState;

/// Run `work` for an accepted delivery inside a span describing it.
async fn process<F>(
    state: &AppState,
    site: &SiteId,
    topic: Topic,
    meta: &WebhookMeta,
    work: F,
) -> Result<StatusCode>
where
    F: Future<Output = StoreResult<SyncOutcome>>,
{
    if !state.config().allows_site(site) {
        return Err(AppError::NotFound(format!("site {site}")));
    }

    if let Some(header) = meta.topic.as_deref()
        && header.parse::<Topic>().ok() != Some(topic)
    {
        tracing::warn!(%site, %topic, header, "X-Shopify-Topic does not match route");
    }

    let span = tracing::info_span!(
        "webhook",
        %site,
        %topic,
        webhook_id = meta.webhook_id.as_deref(),
        shop_domain = meta.shop_domain.as_deref(),
    );
    let outcome = work.instrument(span).await?;

    tracing::debug!(%site, %topic, %outcome, wrote = outcome.wrote(), "Webhook accepted");
    Ok(StatusCode::OK)
}

pub async fn customer_create(
    State(state): State<AppState>,
    Path(site): Path<SiteId>,
    webhook: ShopifyWebhook<CustomerPayload>,
) -> Result<StatusCode> {
    let work = sync::create_customer(state.store(), &webhook.payload);
    process(&state, &site, Topic::CustomerCreate, &webhook.meta, work).await
}

pub async fn customer_enable(
    State(state): State<AppState>,
    Path(site): Path<SiteId>,
    webhook: ShopifyWebhook<CustomerPayload>,
) -> Result<StatusCode> {
    let work = sync::enable_customer(state.store(), &webhook.payload);
    process(&state, &site, Topic::CustomerEnable, &webhook.meta, work).await
}

pub async fn customer_disable(
    State(state): State<AppState>,
    Path(site): Path<SiteId>,
    webhook: ShopifyWebhook<CustomerPayload>,
) -> Result<StatusCode> {
    let work = sync::disable_customer(state.store(), &webhook.payload);
    process(&state, &site, Topic::CustomerDisable, &webhook.meta, work).await
}

pub async fn customer_update(
    State(state): State<AppState>,
    Path(site): Path<SiteId>,
    webhook: ShopifyWebhook<CustomerPayload>,
) -> Result<StatusCode> {
    let work = sync::update_customer(state.store(), &webhook.payload);
    process(&state, &site, Topic::CustomerUpdate, &webhook.meta, work).await
}

pub async fn customer_delete(
    State(state): State<AppState>,
    Path(site): Path<SiteId>,
    webhook: ShopifyWebhook<CustomerDeletePayload>,
) -> Result<StatusCode> {
    let work = sync::delete_customer(state.store(), &webhook.payload);
    process(&state, &site, Topic::CustomerDelete, &webhook.meta, work).await
}

pub async fn shop_update(
    State(state): State<AppState>,
    Path(site): Path<SiteId>,
    webhook: ShopifyWebhook<ShopPayload>,
) -> Result<StatusCode> {
    let work = sync::update_shop(state.store(), &webhook.payload);
    process(&state, &site, Topic::ShopUpdate, &webhook.meta, work).await
}
