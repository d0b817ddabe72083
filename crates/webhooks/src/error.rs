//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding. Webhook handlers return `Result<T, AppError>`; Shopify
//! retries any non-2xx answer, so only genuine failures should end up here.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::StoreError;
use crate::shopify::VerifyError;

/// Application-level error type for the webhook receiver.
#[derive(Debug, Error)]
pub enum AppError {
    /// Persistence operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Webhook signature was missing or wrong.
    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] VerifyError),

    /// Body could not be read or did not match the event schema.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unknown site.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Store(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Webhook processing failed"
            );
        } else {
            tracing::warn!(error = %self, "Webhook rejected");
        }

        let status = match &self {
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Store(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Unauthorized(_) => "Invalid webhook signature".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
