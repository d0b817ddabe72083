//! Sample webhook bodies, as Shopify sends them.

use serde_json::{Value, json};

/// `customers/*` body from the admin's "Send test notification" button.
#[must_use]
pub fn test_button_customer() -> Value {
    json!({
        "accepts_marketing": true,
        "created_at": null,
        "email": "bob@biller.com",
        "first_name": "Bob",
        "id": null,
        "last_name": "Biller",
        "last_order_id": null,
        "multipass_identifier": null,
        "note": "This customer loves ice cream",
        "orders_count": 0,
        "state": "disabled",
        "tax_exempt": false,
        "total_spent": "0.00",
        "updated_at": null,
        "verified_email": true,
        "tags": "",
        "last_order_name": null,
        "addresses": []
    })
}

/// A real `customers/create` body, including the address fields that are
/// not synced.
#[must_use]
pub fn customer_553412611() -> Value {
    let address = json!({
        "address1": "",
        "address2": "",
        "city": "",
        "company": "",
        "country": "United States",
        "first_name": "Test",
        "id": 638_359_939,
        "last_name": "Customer",
        "phone": "",
        "province": "Alabama",
        "zip": "",
        "name": "Test Customer",
        "province_code": "AL",
        "country_code": "US",
        "country_name": "United States",
        "default": true
    });

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
        "total_spent": "0.00",
        "updated_at": "2015-05-27T19:12:19+01:00",
        "verified_email": true,
        "tags": "",
        "last_order_name": null,
        "default_address": address.clone(),
        "addresses": [address]
    })
}

/// `customers/enable` or `customers/disable` body for customer 534645123.
#[must_use]
pub fn customer_534645123(state: &str) -> Value {
    json!({
        "accepts_marketing": true,
        "addresses": [],
        "created_at": "2015-05-27T19:12:19+01:00",
        "email": "bob@biller.com",
        "first_name": "Bob",
        "id": 534_645_123,
        "last_name": "Biller",
        "last_order_id": null,
        "last_order_name": null,
        "multipass_identifier": null,
        "note": "This customer loves ice cream",
        "orders_count": 0,
        "state": state,
        "tags": "",
        "tax_exempt": false,
        "total_spent": "0.00",
        "updated_at": "2015-05-27T19:12:19+01:00",
        "verified_email": true
    })
}

/// `shop/update` body from the "Send test notification" button. Note the
/// missing `name`.
#[must_use]
pub fn test_button_shop() -> Value {
    json!({
        "address1": "190 MacLaren Street",
        "created_at": null,
        "customer_email": null,
        "domain": null,
        "email": "super@supertoys.com",
        "id": null,
        "latitude": null,
        "longitude": null,
        "primary_locale": "en",
        "primary_location_id": null,
        "source": null,
        "currency": "USD",
        "timezone": "(GMT-05:00) Eastern Time (US & Canada)",
        "iana_timezone": null,
        "shop_owner": "N/A",
        "money_format": "$ {{amount}}",
        "money_with_currency_format": "$ {{amount}} USD",
        "taxes_included": null,
        "tax_shipping": null,
        "county_taxes": null,
        "plan_display_name": null,
        "plan_name": null,
        "myshopify_domain": null,
        "google_apps_domain": null,
        "google_apps_login_enabled": null,
        "money_in_emails_format": "${{amount}}",
        "money_with_currency_in_emails_format": "${{amount}} USD",
        "eligible_for_payments": true,
        "requires_extra_payments_agreement": false,
        "password_enabled": null,
        "has_storefront": false
    })
}

/// A real `shop/update` body.
#[must_use]
pub fn shop_8711838() -> Value {
    json!({
        "address1": "121 West Sprint Street",
        "created_at": "2015-05-19T17:45:19+01:00",
        "customer_email": "sales@example.com",
        "domain": "example.myshopify.com",
        "email": "test@example.com",
        "id": 8_711_838,
        "latitude": 12.4567,
        "longitude": -80.1234,
        "name": "Example Shop",
        "primary_locale": "en",
        "primary_location_id": null,
        "source": "learn-more",
        "currency": "USD",
        "timezone": "(GMT+00:00) London",
        "iana_timezone": "Europe/London",
        "shop_owner": "Austin Hartzheim",
        "money_format": "$ {{amount}}",
        "money_with_currency_format": "$ {{amount}} USD",
        "taxes_included": false,
        "tax_shipping": null,
        "county_taxes": null,
        "plan_display_name": "affiliate",
        "plan_name": "affiliate",
        "myshopify_domain": "example.myshopify.com",
        "google_apps_domain": null,
        "google_apps_login_enabled": null,
        "money_in_emails_format": "${{amount}}",
        "money_with_currency_in_emails_format": "${{amount}} USD",
        "eligible_for_payments": true,
        "requires_extra_payments_agreement": false,
        "password_enabled": true,
        "has_storefront": true
    })
}
