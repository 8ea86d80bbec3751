//! Inventory HTTP client implementation.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;

use inventory_core::{Decimal, InventoryKey, LedgerEntry, Operation, Summary};

use crate::error::ClientError;
use crate::types::{ApiErrorResponse, UpdateRequest};

/// Inventory API client.
#[derive(Debug, Clone)]
pub struct InventoryClient {
    client: Client,
    base_url: String,
}

impl InventoryClient {
    /// Create a new inventory client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the inventory service (e.g., `"http://inventory:3000"`)
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new inventory client with custom options.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the HTTP client cannot be built.
    pub fn with_options(
        base_url: impl Into<String>,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Add `quantity` units bought at `unit_price`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn add(
        &self,
        key: &InventoryKey,
        quantity: u64,
        unit_price: Decimal,
        info: Option<&str>,
    ) -> Result<Summary, ClientError> {
        self.update(
            key,
            UpdateRequest {
                operation: Operation::Add,
                quantity,
                unit_price: Some(unit_price),
                info,
            },
        )
        .await
    }

    /// Remove `quantity` units, oldest lots first.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotAvailable` when stock is short, or another
    /// error if the request fails.
    pub async fn remove(
        &self,
        key: &InventoryKey,
        quantity: u64,
        info: Option<&str>,
    ) -> Result<Summary, ClientError> {
        self.update(
            key,
            UpdateRequest {
                operation: Operation::Remove,
                quantity,
                unit_price: None,
                info,
            },
        )
        .await
    }

    /// Current summary, or the one visible strictly before `as_of`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn summary(
        &self,
        key: &InventoryKey,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Summary, ClientError> {
        let url = format!("{}/summary", self.inventory_url(key));
        self.get(&url, as_of).await
    }

    /// Ledger entries, newest first, optionally only those before `as_of`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn log(
        &self,
        key: &InventoryKey,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Vec<LedgerEntry>, ClientError> {
        let url = format!("{}/log", self.inventory_url(key));
        self.get(&url, as_of).await
    }

    fn inventory_url(&self, key: &InventoryKey) -> String {
        format!(
            "{}/customer/{}/product/{}",
            self.base_url, key.customer_id, key.product_id
        )
    }

    async fn update(
        &self,
        key: &InventoryKey,
        request: UpdateRequest<'_>,
    ) -> Result<Summary, ClientError> {
        let url = self.inventory_url(key);
        tracing::debug!(
            url = %url,
            operation = %request.operation,
            quantity = request.quantity,
            "Sending inventory update"
        );

        let response = self.client.put(&url).json(&request).send().await?;

        self.handle_response(response).await
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<T, ClientError> {
        let mut request = self.client.get(url);
        if let Some(at) = as_of {
            request = request.query(&[("as_of", at.to_rfc3339_opts(SecondsFormat::Millis, true))]);
        }

        let response = request.send().await?;

        self.handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            return Ok(serde_json::from_slice(&body)?);
        }

        // Try to parse error response
        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => {
                let error = api_error.error;

                // Map specific error codes to typed errors
                match error.code.as_str() {
                    "invalid_value" => Err(ClientError::InvalidValue {
                        field: error.detail_str("field").unwrap_or_default(),
                        value: error.detail_str("value").unwrap_or_default(),
                    }),
                    "locked" => Err(ClientError::Locked),
                    "not_available" => Err(ClientError::NotAvailable {
                        available: error.detail_u64("available"),
                        requested: error.detail_u64("requested"),
                    }),
                    _ => Err(ClientError::Api {
                        code: error.code,
                        message: error.message,
                        status: status.as_u16(),
                    }),
                }
            }
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}
