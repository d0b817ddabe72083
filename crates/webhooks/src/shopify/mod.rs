//! Shopify webhook wire format.
//!
//! # Delivery
//!
//! Shopify POSTs one JSON document per event. The raw body is signed with
//! HMAC-SHA256 keyed by the app's webhook secret; the base64 digest arrives
//! in `X-Shopify-Hmac-Sha256`. Deliveries are at-least-once and may repeat
//! or arrive out of order.
//!
//! # Test deliveries
//!
//! The "Send test notification" button in the Shopify admin sends sample
//! payloads whose `id` is `null`. These are acknowledged and never stored.

pub mod types;
pub mod verify;

pub use types::{CustomerDeletePayload, CustomerPayload, ShopPayload, Topic, UnknownTopic};
pub use verify::{VerifyError, WebhookVerifier};

/// Header carrying the base64 HMAC-SHA256 of the raw body.
pub const HMAC_HEADER: &str = "x-shopify-hmac-sha256";
/// Header carrying the event topic, e.g. `customers/create`.
pub const TOPIC_HEADER: &str = "x-shopify-topic";
/// Header carrying the unique delivery id.
pub const WEBHOOK_ID_HEADER: &str = "x-shopify-webhook-id";
/// Header carrying the sending shop's `myshopify.com` domain.
pub const SHOP_DOMAIN_HEADER: &str = "x-shopify-shop-domain";
