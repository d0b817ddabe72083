//! Signed webhook deliveries through the full router.
//!
//! Mirrors Shopify's documented sample deliveries: test-button payloads
//! (null ids), real customer and shop payloads, and repeated deliveries.
//! Runs against the in-memory store, so no services are needed.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde_json::json;

use shopsync_core::{CustomerState, ShopifyId};
use shopsync_integration_tests::fixtures;
use shopsync_integration_tests::{TEST_SITE, TestApp};
use shopsync_webhooks::db::{StoreCounts, WebhookStore};

const CUSTOMER_EVENTS: [&str; 4] = [
    "customer_create",
    "customer_enable",
    "customer_disable",
    "customer_update",
];

async fn counts(app: &TestApp) -> StoreCounts {
    app.store.counts().await.unwrap()
}

// ============================================================================
// Test deliveries
// ============================================================================

#[tokio::test]
async fn test_button_payloads_are_acknowledged_but_not_stored() {
    let app = TestApp::new();

    for event in CUSTOMER_EVENTS {
        let resp = app
            .deliver(TEST_SITE, event, &fixtures::test_button_customer())
            .await;
        assert_eq!(resp.status, StatusCode::OK, "{event}");
        assert!(resp.body.is_empty(), "{event}");
    }

    let resp = app
        .deliver(TEST_SITE, "customer_delete", &json!({"id": null}))
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    let resp = app
        .deliver(TEST_SITE, "shop_update", &fixtures::test_button_shop())
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    assert_eq!(counts(&app).await, StoreCounts::default());
}

// ============================================================================
// customers/create
// ============================================================================

#[tokio::test]
async fn test_customer_create_copies_fields_and_tags() {
    let app = TestApp::new();
    let mut data = fixtures::customer_553412611();

    let resp = app.deliver(TEST_SITE, "customer_create", &data).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(counts(&app).await.customers, 1);

    let customer = app
        .store
        .customer_by_shopify_id(ShopifyId::new(553_412_611))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(customer.details.email.as_deref(), Some("testme@example.com"));
    assert_eq!(customer.details.first_name.as_deref(), Some("Test"));
    assert_eq!(customer.details.last_name.as_deref(), Some("Customer"));
    assert_eq!(customer.details.note.as_deref(), Some(""));
    assert_eq!(customer.details.orders_count, 0);
    assert_eq!(customer.details.state, CustomerState::Disabled);
    assert!(!customer.details.accepts_marketing);
    assert!(customer.details.verified_email);
    assert_eq!(customer.details.total_spent, Decimal::ZERO);
    assert!(customer.details.last_order_id.is_none());
    assert_eq!(
        customer.details.shopify_created_at.unwrap().to_rfc3339(),
        "2015-05-27T18:12:18+00:00"
    );

    // A second, distinct customer with tags.
    data["first_name"] = json!("Test2");
    data["email"] = json!("testyou@example.com");
    data["id"] = json!(553_412_612);
    data["tags"] = json!("hello, world");

    let resp = app.deliver(TEST_SITE, "customer_create", &data).await;
    assert_eq!(resp.status, StatusCode::OK);

    let id = ShopifyId::new(553_412_612);
    let customer = app.store.customer_by_shopify_id(id).await.unwrap().unwrap();
    assert_eq!(customer.details.first_name.as_deref(), Some("Test2"));
    assert_eq!(customer.details.email.as_deref(), Some("testyou@example.com"));
    assert_eq!(app.store.customer_tags(id).await.unwrap(), ["hello", "world"]);
    assert_eq!(counts(&app).await.customers, 2);
}

#[tokio::test]
async fn test_customer_create_twice_is_idempotent() {
    let app = TestApp::new();
    let data = fixtures::customer_553412611();

    let first = app.deliver(TEST_SITE, "customer_create", &data).await;
    let second = app.deliver(TEST_SITE, "customer_create", &data).await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(counts(&app).await.customers, 1);
}

// ============================================================================
// customers/enable and customers/disable
// ============================================================================

#[tokio::test]
async fn test_customer_enable_existing_customer() {
    let app = TestApp::new();
    app.deliver(TEST_SITE, "customer_disable", &fixtures::customer_534645123("disabled"))
        .await;

    let resp = app
        .deliver(TEST_SITE, "customer_enable", &fixtures::customer_534645123("enabled"))
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    let customer = app
        .store
        .customer_by_shopify_id(ShopifyId::new(534_645_123))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(customer.details.state, CustomerState::Enabled);
    assert_eq!(counts(&app).await.customers, 1);
}

#[tokio::test]
async fn test_customer_enable_unknown_customer_creates_it() {
    let app = TestApp::new();

    let resp = app
        .deliver(TEST_SITE, "customer_enable", &fixtures::customer_534645123("enabled"))
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    assert_eq!(counts(&app).await.customers, 1);
    let customer = app
        .store
        .customer_by_shopify_id(ShopifyId::new(534_645_123))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(customer.details.state, CustomerState::Enabled);
    assert_eq!(customer.details.email.as_deref(), Some("bob@biller.com"));
}

#[tokio::test]
async fn test_customer_disable_tolerates_unexpected_state_value() {
    let app = TestApp::new();
    app.deliver(TEST_SITE, "customer_enable", &fixtures::customer_534645123("enabled"))
        .await;

    // Shopify has sent "disable" rather than "disabled" here.
    let resp = app
        .deliver(TEST_SITE, "customer_disable", &fixtures::customer_534645123("disable"))
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    let customer = app
        .store
        .customer_by_shopify_id(ShopifyId::new(534_645_123))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(customer.details.state, CustomerState::Disabled);
}

#[tokio::test]
async fn test_state_handlers_ignore_payload_state() {
    let app = TestApp::new();

    app.deliver(TEST_SITE, "customer_enable", &fixtures::customer_534645123("disabled"))
        .await;
    let customer = app
        .store
        .customer_by_shopify_id(ShopifyId::new(534_645_123))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(customer.details.state, CustomerState::Enabled);

    app.deliver(TEST_SITE, "customer_disable", &fixtures::customer_534645123("enabled"))
        .await;
    let customer = app
        .store
        .customer_by_shopify_id(ShopifyId::new(534_645_123))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(customer.details.state, CustomerState::Disabled);
}

// ============================================================================
// customers/update
// ============================================================================

#[tokio::test]
async fn test_customer_update_creates_then_replaces_tags() {
    let app = TestApp::new();
    let id = ShopifyId::new(553_412_611);
    let mut data = fixtures::customer_553412611();
    data.as_object_mut().unwrap().remove("first_name");
    data.as_object_mut().unwrap().remove("last_name");
    data["updated_at"] = json!("2015-05-27T21:30:34+01:00");
    data["tags"] = json!("hello, secondtag, shorttag, world");

    let resp = app.deliver(TEST_SITE, "customer_update", &data).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(counts(&app).await.customers, 1);
    assert_eq!(
        app.store.customer_tags(id).await.unwrap(),
        ["hello", "secondtag", "shorttag", "world"]
    );

    data["email"] = json!("updatedemail@example.com");
    data["tags"] = json!("tag1, tag2");

    let resp = app.deliver(TEST_SITE, "customer_update", &data).await;
    assert_eq!(resp.status, StatusCode::OK);

    let c = counts(&app).await;
    assert_eq!(c.customers, 1);
    assert_eq!(c.customer_tags, 2);
    // Old tags stay in the vocabulary; only the links are removed.
    assert_eq!(c.tags, 6);

    let customer = app.store.customer_by_shopify_id(id).await.unwrap().unwrap();
    assert_eq!(
        customer.details.email.as_deref(),
        Some("updatedemail@example.com")
    );
    assert!(customer.details.first_name.is_none());
    assert_eq!(app.store.customer_tags(id).await.unwrap(), ["tag1", "tag2"]);
}

#[tokio::test]
async fn test_customer_update_copies_total_spent_exactly() {
    let app = TestApp::new();
    let mut data = fixtures::customer_553412611();
    data["total_spent"] = json!("1234.56");
    data["orders_count"] = json!(17);

    app.deliver(TEST_SITE, "customer_update", &data).await;

    let customer = app
        .store
        .customer_by_shopify_id(ShopifyId::new(553_412_611))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(customer.details.total_spent, Decimal::new(123_456, 2));
    assert_eq!(customer.details.orders_count, 17);
}

// ============================================================================
// customers/delete
// ============================================================================

#[tokio::test]
async fn test_customer_delete_twice() {
    let app = TestApp::new();
    let mut data = fixtures::customer_534645123("enabled");
    data["tags"] = json!("vip");
    app.deliver(TEST_SITE, "customer_update", &data).await;
    assert_eq!(counts(&app).await.customers, 1);

    let body = json!({"id": 534_645_123});

    let resp = app.deliver(TEST_SITE, "customer_delete", &body).await;
    assert_eq!(resp.status, StatusCode::OK);
    let c = counts(&app).await;
    assert_eq!(c.customers, 0);
    assert_eq!(c.customer_tags, 0);
    assert_eq!(c.tags, 1);

    let resp = app.deliver(TEST_SITE, "customer_delete", &body).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(counts(&app).await.customers, 0);
}

// ============================================================================
// shop/update
// ============================================================================

#[tokio::test]
async fn test_shop_update_creates_then_updates() {
    let app = TestApp::new();
    let id = ShopifyId::new(8_711_838);
    let mut data = fixtures::shop_8711838();

    let resp = app.deliver(TEST_SITE, "shop_update", &data).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(counts(&app).await.shops, 1);

    let shop = app.store.shop_by_shopify_id(id).await.unwrap().unwrap();
    assert_eq!(shop.shopify_id, id);
    assert_eq!(shop.details.address1.as_deref(), Some("121 West Sprint Street"));
    assert_eq!(shop.details.latitude, Some(12.4567));
    assert_eq!(shop.details.iana_timezone.as_deref(), Some("Europe/London"));
    assert_eq!(shop.details.taxes_included, Some(false));
    assert_eq!(shop.details.tax_shipping, None);
    assert_eq!(shop.details.has_storefront, Some(true));
    assert!(shop.details.city.is_none());

    data["city"] = json!("New York");
    data["shop_owner"] = json!("Bob Smith");

    let resp = app.deliver(TEST_SITE, "shop_update", &data).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(counts(&app).await.shops, 1);

    let updated = app.store.shop_by_shopify_id(id).await.unwrap().unwrap();
    assert_eq!(updated.id, shop.id);
    assert_eq!(updated.details.city.as_deref(), Some("New York"));
    assert_eq!(updated.details.shop_owner.as_deref(), Some("Bob Smith"));
}

// ============================================================================
// Rejections
// ============================================================================

#[tokio::test]
async fn test_missing_signature_is_unauthorized() {
    let app = TestApp::new();
    let body = serde_json::to_vec(&fixtures::customer_553412611()).unwrap();

    let resp = app
        .post("/webhooks/shopify/abcd/customer_create", body, None)
        .await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(counts(&app).await.customers, 0);
}

#[tokio::test]
async fn test_bad_signature_is_unauthorized() {
    let app = TestApp::new();
    let body = serde_json::to_vec(&fixtures::customer_553412611()).unwrap();
    let signature = app.sign(b"some other body");

    let resp = app
        .post("/webhooks/shopify/abcd/customer_create", body, Some(&signature))
        .await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body, "Invalid webhook signature");
    assert_eq!(counts(&app).await.customers, 0);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::new();
    let body = b"{not json".to_vec();
    let signature = app.sign(&body);

    let resp = app
        .post("/webhooks/shopify/abcd/customer_update", body, Some(&signature))
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_total_spent_is_bad_request() {
    let app = TestApp::new();
    let mut data = fixtures::customer_553412611();
    data["total_spent"] = json!("abc");

    let resp = app.deliver(TEST_SITE, "customer_create", &data).await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(counts(&app).await.customers, 0);
}

#[tokio::test]
async fn test_unknown_site_with_allow_list_is_not_found() {
    let app = TestApp::with_sites(&["main-store"]);

    let resp = app
        .deliver("abcd", "customer_create", &fixtures::customer_553412611())
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(counts(&app).await.customers, 0);

    let resp = app
        .deliver("main-store", "customer_create", &fixtures::customer_553412611())
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(counts(&app).await.customers, 1);
}

#[tokio::test]
async fn test_invalid_site_id_is_rejected() {
    let app = TestApp::new();

    let resp = app
        .deliver("bad.site", "customer_create", &fixtures::customer_553412611())
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_event_is_not_found() {
    let app = TestApp::new();

    let resp = app
        .deliver(TEST_SITE, "order_create", &json!({"id": 1}))
        .await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();

    let resp = app.get("/health").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, "ok");

    let resp = app.get("/health/ready").await;
    assert_eq!(resp.status, StatusCode::OK);
}
