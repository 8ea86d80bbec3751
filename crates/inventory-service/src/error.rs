//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use inventory_core::InventoryError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed input.
    #[error("invalid value {value} for field {field}")]
    InvalidValue {
        /// Name of the offending field.
        field: String,
        /// The offending value.
        value: String,
    },

    /// Another mutation holds the inventory lock.
    #[error("inventory is currently locked")]
    Locked {
        /// Customer half of the contended key.
        customer_id: String,
        /// Product half of the contended key.
        product_id: String,
    },

    /// Removal requested more than is available.
    #[error("unable to remove more items than available")]
    NotAvailable {
        /// Quantity available.
        available: u64,
        /// Quantity requested.
        requested: u64,
    },

    /// No route matched.
    #[error("not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::InvalidValue { field, value } => (
                StatusCode::BAD_REQUEST,
                "invalid_value",
                self.to_string(),
                Some(serde_json::json!({
                    "field": field,
                    "value": value
                })),
            ),
            Self::Locked {
                customer_id,
                product_id,
            } => (
                StatusCode::LOCKED,
                "locked",
                self.to_string(),
                Some(serde_json::json!({
                    "customer_id": customer_id,
                    "product_id": product_id
                })),
            ),
            Self::NotAvailable {
                available,
                requested,
            } => (
                StatusCode::CONFLICT,
                "not_available",
                self.to_string(),
                Some(serde_json::json!({
                    "available": available,
                    "requested": requested
                })),
            ),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone(), None),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl ApiError {
    /// Build an [`ApiError::InvalidValue`].
    pub fn invalid(field: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.to_string(),
        }
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::InvalidValue { field, value } => Self::InvalidValue {
                field: field.to_string(),
                value,
            },
            InventoryError::Locked { key } => Self::Locked {
                customer_id: key.customer_id.to_string(),
                product_id: key.product_id.to_string(),
            },
            InventoryError::NotAvailable {
                available,
                requested,
            } => Self::NotAvailable {
                available,
                requested,
            },
            InventoryError::Internal(msg) => Self::Internal(msg),
        }
    }
}
