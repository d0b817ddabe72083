//! Shop domain types.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use shopsync_core::{ShopId, ShopifyId};

/// Shop attributes copied from the `shop/update` payload.
///
/// Deserialized directly from the payload (flattened into
/// [`ShopPayload`](crate::shopify::ShopPayload)). Every field may be `null`
/// or absent; Shopify's test delivery omits even `name`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, sqlx::FromRow)]
pub struct ShopDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub myshopify_domain: Option<String>,
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub province_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub primary_locale: Option<String>,
    #[serde(default)]
    pub primary_location_id: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub iana_timezone: Option<String>,
    #[serde(default)]
    pub shop_owner: Option<String>,
    #[serde(default)]
    pub money_format: Option<String>,
    #[serde(default)]
    pub money_with_currency_format: Option<String>,
    #[serde(default)]
    pub money_in_emails_format: Option<String>,
    #[serde(default)]
    pub money_with_currency_in_emails_format: Option<String>,
    #[serde(default)]
    pub plan_name: Option<String>,
    #[serde(default)]
    pub plan_display_name: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub google_apps_domain: Option<String>,
    #[serde(default)]
    pub google_apps_login_enabled: Option<bool>,
    #[serde(default)]
    pub taxes_included: Option<bool>,
    #[serde(default)]
    pub tax_shipping: Option<bool>,
    #[serde(default)]
    pub county_taxes: Option<bool>,
    #[serde(default)]
    pub eligible_for_payments: Option<bool>,
    #[serde(default)]
    pub requires_extra_payments_agreement: Option<bool>,
    #[serde(default)]
    pub password_enabled: Option<bool>,
    #[serde(default)]
    pub has_storefront: Option<bool>,
    /// `created_at` as reported by Shopify.
    #[serde(default, rename = "created_at")]
    pub shopify_created_at: Option<DateTime<Utc>>,
}

/// A synchronized shop.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Shop {
    /// Local row id.
    pub id: ShopId,
    /// Shopify's shop id.
    pub shopify_id: ShopifyId,
    #[sqlx(flatten)]
    pub details: ShopDetails,
    /// When the row was first written.
    pub created_at: DateTime<Utc>,
    /// When the row was last written.
    pub updated_at: DateTime<Utc>,
}
