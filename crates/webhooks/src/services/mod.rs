//! Business logic services for the webhook receiver.
//!
//! # Services
//!
//! - `sync` - Apply webhook payloads to a [`WebhookStore`](crate::db::WebhookStore)

pub mod sync;

pub use sync::{ApplyError, SyncOutcome};
