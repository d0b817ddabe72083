//! HTTP route handlers for the webhook receiver.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                         - Liveness
//! GET  /health/ready                                   - Store connectivity
//!
//! # Shopify webhooks (signed, JSON body, empty 200 on acceptance)
//! POST /webhooks/shopify/{site_id}/customer_create
//! POST /webhooks/shopify/{site_id}/customer_enable
//! POST /webhooks/shopify/{site_id}/customer_disable
//! POST /webhooks/shopify/{site_id}/customer_update
//! POST /webhooks/shopify/{site_id}/customer_delete
//! POST /webhooks/shopify/{site_id}/shop_update
//! ```

pub mod health;
pub mod webhooks;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::shopify::Topic;
use crate::state::AppState;

/// Build the webhook routes (without state).
pub fn routes() -> Router<AppState> {
    let path = |topic: Topic| format!("/webhooks/shopify/{{site_id}}/{}", topic.path_segment());

    Router::new()
        .route(&path(Topic::CustomerCreate), post(webhooks::customer_create))
        .route(&path(Topic::CustomerEnable), post(webhooks::customer_enable))
        .route(&path(Topic::CustomerDisable), post(webhooks::customer_disable))
        .route(&path(Topic::CustomerUpdate), post(webhooks::customer_update))
        .route(&path(Topic::CustomerDelete), post(webhooks::customer_delete))
        .route(&path(Topic::ShopUpdate), post(webhooks::shop_update))
}

/// Build the complete application router with request tracing.
///
/// Sentry layers are added by the binary so tests can drive this router
/// without a Sentry client.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
