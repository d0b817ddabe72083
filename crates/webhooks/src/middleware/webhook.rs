//! Verified webhook body extractor.
//!
//! `ShopifyWebhook<T>` buffers the raw body, checks its HMAC against the
//! configured secret, and only then deserializes it. Handlers never see an
//! unsigned payload.
//!
//! # Usage
//!
//! ```rust,ignore
//! async fn handler(ShopifyWebhook { meta, payload }: ShopifyWebhook<CustomerPayload>) {
//!     tracing::info!(topic = ?meta.topic, id = ?payload.id, "received");
//! }
//! ```

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::HeaderMap;
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::shopify::{HMAC_HEADER, SHOP_DOMAIN_HEADER, TOPIC_HEADER, WEBHOOK_ID_HEADER};
use crate::state::AppState;

/// Delivery headers Shopify attaches to every webhook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookMeta {
    pub topic: Option<String>,
    pub webhook_id: Option<String>,
    pub shop_domain: Option<String>,
}

impl WebhookMeta {
    fn from_headers(headers: &HeaderMap) -> Self {
        let get = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };

        Self {
            topic: get(TOPIC_HEADER),
            webhook_id: get(WEBHOOK_ID_HEADER),
            shop_domain: get(SHOP_DOMAIN_HEADER),
        }
    }
}

/// A signed, parsed webhook body.
#[derive(Debug, Clone)]
pub struct ShopifyWebhook<T> {
    pub meta: WebhookMeta,
    pub payload: T,
}

impl<T> FromRequest<AppState> for ShopifyWebhook<T>
where
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let meta = WebhookMeta::from_headers(req.headers());
        let signature = req
            .headers()
            .get(HMAC_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(format!("unreadable body: {e}")))?;

        state.verifier().verify(&body, signature.as_deref())?;

        let payload = serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("invalid payload: {e}")))?;

        Ok(Self { meta, payload })
    }
}
