//! Request extractors for webhook routes.

pub mod webhook;

pub use webhook::{ShopifyWebhook, WebhookMeta};
