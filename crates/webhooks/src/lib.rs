//! Shopsync webhook receiver library.
//!
//! Receives Shopify customer and shop webhooks and keeps a local copy of
//! those records. Exposed as a library so the router can be driven by
//! tests and the sync services reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;
