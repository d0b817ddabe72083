//! shopsync core - shared types library.
//!
//! This crate provides the types used across the shopsync components:
//! - `webhooks` - Shopify webhook receiver (HTTP service + sync logic)
//! - `cli` - Command-line tools for migrations, stats and payload replay
//!
//! # Architecture
//!
//! The core crate contains only types and parsing - no I/O, no database access,
//! no HTTP. The optional `postgres` feature adds `sqlx` encode/decode support.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, customer state, tag names and site ids

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
