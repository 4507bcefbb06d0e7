//! API error types and response mapping
//!
//! Every error terminates at the handler boundary: it is logged once with
//! a correlation id and its kind, then rendered as `{"error": message}`.
//! Internal failures keep their detail in the log and send the client a
//! generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::payment::CheckoutError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed id or request body (400)
    #[error("{0}")]
    BadRequest(String),

    /// Unknown album id (404)
    #[error("Album not found")]
    NotFound,

    /// Purchase attempted on an album that is not yet released (400)
    #[error("Album not yet released")]
    NotReleased,

    /// Payment processor call failed (500, processor message included)
    #[error("Error creating checkout session: {0}")]
    Upstream(String),

    /// Unexpected store or seeding failure (500, generic message)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ceazy_common::Error> for ApiError {
    fn from(err: ceazy_common::Error) -> Self {
        // Everything the store can fail with mid-request is unexpected
        ApiError::Internal(err.to_string())
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::NotReleased => (StatusCode::BAD_REQUEST, "NOT_RELEASED"),
            ApiError::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        // Correlation id ties the client-visible failure to the log line
        let correlation_id = Uuid::new_v4();
        if status.is_server_error() {
            tracing::error!(%correlation_id, kind, error = %self, "request failed");
        } else {
            tracing::debug!(%correlation_id, kind, error = %self, "request rejected");
        }

        let message = match &self {
            ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
