//! Domain types for synchronized Shopify records.
//!
//! `*Details` structs hold the DIRECT_COPY_FIELDS of an entity: the scalar
//! attributes copied verbatim from a webhook payload. The persisted entity
//! wraps them with the local row id and bookkeeping timestamps.

pub mod customer;
pub mod shop;

pub use customer::{Customer, CustomerDetails};
pub use shop::{Shop, ShopDetails};
