//! Customer domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use shopsync_core::{CustomerId, CustomerState, ShopifyId};

/// Customer attributes copied from a webhook payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, sqlx::FromRow)]
pub struct CustomerDetails {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub note: Option<String>,
    pub orders_count: i32,
    pub state: CustomerState,
    pub tax_exempt: bool,
    /// Lifetime spend, parsed exactly from Shopify's decimal string.
    pub total_spent: Decimal,
    pub verified_email: bool,
    pub accepts_marketing: bool,
    pub multipass_identifier: Option<String>,
    pub last_order_id: Option<i64>,
    pub last_order_name: Option<String>,
    /// `created_at` as reported by Shopify.
    pub shopify_created_at: Option<DateTime<Utc>>,
    /// `updated_at` as reported by Shopify.
    pub shopify_updated_at: Option<DateTime<Utc>>,
}

/// A synchronized customer.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Customer {
    /// Local row id.
    pub id: CustomerId,
    /// Shopify's customer id.
    pub shopify_id: ShopifyId,
    #[sqlx(flatten)]
    pub details: CustomerDetails,
    /// When the row was first written.
    pub created_at: DateTime<Utc>,
    /// When the row was last written.
    pub updated_at: DateTime<Utc>,
}
