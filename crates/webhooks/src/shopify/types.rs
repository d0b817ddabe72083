//! Webhook payload schemas.
//!
//! One struct per event family. Only the keys that are stored are modeled;
//! everything else in the document (addresses, `default_address`, ...) is
//! ignored during deserialization.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use shopsync_core::{CustomerState, ShopifyId};

use crate::models::{CustomerDetails, ShopDetails};

// =============================================================================
// Topics
// =============================================================================

/// The webhook events this service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    CustomerCreate,
    CustomerEnable,
    CustomerDisable,
    CustomerUpdate,
    CustomerDelete,
    ShopUpdate,
}

/// Returned when a string names no known [`Topic`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown webhook topic: {0}")]
pub struct UnknownTopic(pub String);

impl Topic {
    pub const ALL: [Self; 6] = [
        Self::CustomerCreate,
        Self::CustomerEnable,
        Self::CustomerDisable,
        Self::CustomerUpdate,
        Self::CustomerDelete,
        Self::ShopUpdate,
    ];

    /// Last path segment of the route, e.g. `customer_create`.
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::CustomerCreate => "customer_create",
            Self::CustomerEnable => "customer_enable",
            Self::CustomerDisable => "customer_disable",
            Self::CustomerUpdate => "customer_update",
            Self::CustomerDelete => "customer_delete",
            Self::ShopUpdate => "shop_update",
        }
    }

    /// Topic name as sent in `X-Shopify-Topic`, e.g. `customers/create`.
    #[must_use]
    pub const fn shopify_topic(self) -> &'static str {
        match self {
            Self::CustomerCreate => "customers/create",
            Self::CustomerEnable => "customers/enable",
            Self::CustomerDisable => "customers/disable",
            Self::CustomerUpdate => "customers/update",
            Self::CustomerDelete => "customers/delete",
            Self::ShopUpdate => "shop/update",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl std::str::FromStr for Topic {
    type Err = UnknownTopic;

    /// Accepts either the route segment or the Shopify topic name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.path_segment() == s || t.shopify_topic() == s)
            .ok_or_else(|| UnknownTopic(s.to_owned()))
    }
}

// =============================================================================
// Customer
// =============================================================================

/// Body of `customers/create`, `customers/update`, `customers/enable` and
/// `customers/disable`.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerPayload {
    /// `null` (or absent) on test deliveries.
    #[serde(default)]
    pub id: Option<ShopifyId>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    pub orders_count: i32,
    /// Raw state text. Shopify has been seen sending values outside the
    /// documented set, so this is parsed leniently by [`Self::details`].
    pub state: String,
    pub tax_exempt: bool,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_spent: Decimal,
    pub verified_email: bool,
    pub accepts_marketing: bool,
    #[serde(default)]
    pub multipass_identifier: Option<String>,
    #[serde(default)]
    pub last_order_id: Option<i64>,
    #[serde(default)]
    pub last_order_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Comma-separated tag list. `None` leaves the stored tags alone.
    #[serde(default)]
    pub tags: Option<String>,
}

impl CustomerPayload {
    /// The payload's `state`, falling back to [`CustomerState::Disabled`]
    /// when Shopify sends something unrecognised.
    #[must_use]
    pub fn customer_state(&self) -> CustomerState {
        self.state.parse().unwrap_or_else(|e| {
            tracing::warn!(
                shopify_id = ?self.id,
                error = %e,
                "Unrecognised customer state, storing as disabled"
            );
            CustomerState::Disabled
        })
    }

    /// Directly copied attributes of this payload.
    #[must_use]
    pub fn details(&self) -> CustomerDetails {
        CustomerDetails {
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            note: self.note.clone(),
            orders_count: self.orders_count,
            state: self.customer_state(),
            tax_exempt: self.tax_exempt,
            total_spent: self.total_spent,
            verified_email: self.verified_email,
            accepts_marketing: self.accepts_marketing,
            multipass_identifier: self.multipass_identifier.clone(),
            last_order_id: self.last_order_id,
            last_order_name: self.last_order_name.clone(),
            shopify_created_at: self.created_at,
            shopify_updated_at: self.updated_at,
        }
    }
}

/// Body of `customers/delete`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CustomerDeletePayload {
    #[serde(default)]
    pub id: Option<ShopifyId>,
}

// =============================================================================
// Shop
// =============================================================================

/// Body of `shop/update`.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopPayload {
    #[serde(default)]
    pub id: Option<ShopifyId>,
    #[serde(flatten)]
    pub details: ShopDetails,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn customer_json() -> serde_json::Value {
        json!({
            "accepts_marketing": false,
            "created_at": "2015-05-27T19:12:18+01:00",
            "email": "testme@example.com",
            "first_name": "Test",
            "id": 553_412_611,
            "last_name": "Customer",
            "last_order_id": null,
            "multipass_identifier": null,
            "note": "",
            "orders_count": 0,
            "state": "disabled",
            "tax_exempt": false,
            "total_spent": "12.50",
            "updated_at": "2015-05-27T19:12:19+01:00",
            "verified_email": true,
            "tags": "",
            "last_order_name": null,
            "addresses": []
        })
    }

    #[test]
    fn test_customer_payload_parses() {
        let payload: CustomerPayload = serde_json::from_value(customer_json()).unwrap();
        assert_eq!(payload.id, Some(ShopifyId::new(553_412_611)));
        assert_eq!(payload.total_spent, Decimal::new(1250, 2));
        assert_eq!(
            payload.created_at.unwrap().to_rfc3339(),
            "2015-05-27T18:12:18+00:00"
        );
        assert_eq!(payload.tags.as_deref(), Some(""));
    }

    #[test]
    fn test_customer_null_id_is_test_payload() {
        let mut value = customer_json();
        value["id"] = serde_json::Value::Null;
        let payload: CustomerPayload = serde_json::from_value(value).unwrap();
        assert!(payload.id.is_none());

        let mut value = customer_json();
        value.as_object_mut().unwrap().remove("id");
        let payload: CustomerPayload = serde_json::from_value(value).unwrap();
        assert!(payload.id.is_none());
    }

    #[test]
    fn test_customer_missing_tags_is_none() {
        let mut value = customer_json();
        value.as_object_mut().unwrap().remove("tags");
        let payload: CustomerPayload = serde_json::from_value(value).unwrap();
        assert!(payload.tags.is_none());
    }

    #[test]
    fn test_customer_total_spent_must_be_decimal() {
        let mut value = customer_json();
        value["total_spent"] = json!("abc");
        assert!(serde_json::from_value::<CustomerPayload>(value).is_err());
    }

    #[test]
    fn test_customer_required_key_missing() {
        let mut value = customer_json();
        value.as_object_mut().unwrap().remove("orders_count");
        assert!(serde_json::from_value::<CustomerPayload>(value).is_err());
    }

    #[test]
    fn test_unknown_state_falls_back_to_disabled() {
        let mut value = customer_json();
        value["state"] = json!("disable");
        let payload: CustomerPayload = serde_json::from_value(value).unwrap();
        assert_eq!(payload.details().state, CustomerState::Disabled);

        let mut value = customer_json();
        value["state"] = json!("invited");
        let payload: CustomerPayload = serde_json::from_value(value).unwrap();
        assert_eq!(payload.details().state, CustomerState::Invited);
    }

    #[test]
    fn test_delete_payload() {
        let payload: CustomerDeletePayload =
            serde_json::from_value(json!({"id": 534_645_123})).unwrap();
        assert_eq!(payload.id, Some(ShopifyId::new(534_645_123)));

        let payload: CustomerDeletePayload = serde_json::from_value(json!({"id": null})).unwrap();
        assert!(payload.id.is_none());
    }

    #[test]
    fn test_shop_test_payload_without_name() {
        let payload: ShopPayload = serde_json::from_value(json!({
            "address1": "190 MacLaren Street",
            "created_at": null,
            "email": "super@supertoys.com",
            "id": null,
            "latitude": null,
            "currency": "USD",
            "money_format": "$ {{amount}}",
            "eligible_for_payments": true,
            "has_storefront": false
        }))
        .unwrap();

        assert!(payload.id.is_none());
        assert!(payload.details.name.is_none());
        assert_eq!(payload.details.eligible_for_payments, Some(true));
        assert_eq!(payload.details.money_format.as_deref(), Some("$ {{amount}}"));
    }

    #[test]
    fn test_shop_payload_fields() {
        let payload: ShopPayload = serde_json::from_value(json!({
            "id": 8_711_838,
            "name": "Example",
            "created_at": "2015-05-19T17:45:19+01:00",
            "latitude": 12.4567,
            "longitude": -80.1234,
            "primary_location_id": null,
            "iana_timezone": "Europe/London",
            "shop_owner": "Austin Hartzheim",
            "password_enabled": true
        }))
        .unwrap();

        assert_eq!(payload.id, Some(ShopifyId::new(8_711_838)));
        assert_eq!(payload.details.latitude, Some(12.4567));
        assert_eq!(payload.details.shop_owner.as_deref(), Some("Austin Hartzheim"));
        assert!(payload.details.shopify_created_at.is_some());
    }

    #[test]
    fn test_topic_parsing() {
        for topic in Topic::ALL {
            assert_eq!(topic.path_segment().parse::<Topic>().unwrap(), topic);
            assert_eq!(topic.shopify_topic().parse::<Topic>().unwrap(), topic);
        }
        assert!("orders/create".parse::<Topic>().is_err());
    }
}
