//! Request and response types for the inventory client.

use serde::{Deserialize, Serialize};

use inventory_core::{Decimal, Operation};

/// Body of an add or remove request.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct UpdateRequest<'a> {
    pub operation: Operation,
    pub quantity: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<&'a str>,
}

/// Error response body returned by the service.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

impl ApiErrorBody {
    pub fn detail_str(&self, name: &str) -> Option<String> {
        self.details
            .as_ref()
            .and_then(|d| d.get(name))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
    }

    pub fn detail_u64(&self, name: &str) -> u64 {
        self.details
            .as_ref()
            .and_then(|d| d.get(name))
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(0)
    }
}
