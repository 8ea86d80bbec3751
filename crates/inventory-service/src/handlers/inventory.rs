//! Inventory mutation and read handlers.
//!
//! Request values arrive loosely typed and are parsed with
//! `inventory_core::validate` before the engine is called. Engine calls are
//! synchronous and run on the blocking pool.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use inventory_core::{validate, InventoryKey, LedgerEntry, Operation, Summary};

use crate::error::ApiError;
use crate::state::AppState;

/// Path parameters identifying one inventory.
#[derive(Debug, Deserialize)]
pub struct InventoryPath {
    /// Customer UUID.
    pub customer_id: String,
    /// Product UUID.
    pub product_id: String,
}

impl InventoryPath {
    fn key(&self) -> Result<InventoryKey, ApiError> {
        Ok(validate::key(&self.customer_id, &self.product_id)?)
    }
}

/// Body of `PUT /customer/:customer_id/product/:product_id`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateRequest {
    /// `add`, `remove` or `rm`.
    pub operation: String,
    /// Units to move. Number or numeric string.
    pub quantity: Value,
    /// Price per unit, required for `add`. Number or numeric string.
    pub unit_price: Option<Value>,
    /// Free-form note stored on the ledger entry.
    pub info: Option<String>,
}

/// Query of the read endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct AsOfQuery {
    /// Cutoff; only state strictly before it is returned.
    #[serde(alias = "date")]
    pub as_of: Option<String>,
}

/// Summary body of the update and summary endpoints.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    /// Inventory the summary belongs to.
    #[serde(flatten)]
    pub key: InventoryKey,
    /// Wall-clock time of the transaction that produced the summary.
    pub date: Option<DateTime<Utc>>,
    /// Lots and totals.
    #[serde(flatten)]
    pub summary: Summary,
}

impl SummaryResponse {
    fn new(key: InventoryKey, summary: Summary) -> Self {
        Self {
            key,
            date: summary.as_of.map(|id| id.timestamp()),
            summary,
        }
    }
}

/// Apply an `add` or `remove` and return the resulting summary.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(path): Path<InventoryPath>,
    body: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let key = path.key()?;
    let Json(request) = body.map_err(|rejection| ApiError::invalid("body", rejection.body_text()))?;

    let operation: Operation = request.operation.parse()?;
    let quantity = validate::quantity(&request.quantity)?;

    tracing::debug!(
        customer_id = %key.customer_id,
        product_id = %key.product_id,
        operation = %operation,
        quantity = quantity,
        "Inventory update requested"
    );

    let info = request.info;
    let summary = match operation {
        Operation::Add => {
            let unit_price = validate::unit_price(request.unit_price.as_ref().unwrap_or(&Value::Null))?;
            run_blocking(state, move |inventory| {
                inventory.add(&key, quantity, unit_price, info)
            })
            .await?
        }
        Operation::Remove => {
            run_blocking(state, move |inventory| inventory.remove(&key, quantity, info)).await?
        }
    };

    Ok(Json(SummaryResponse::new(key, summary)))
}

/// Current or point-in-time summary.
pub async fn summary(
    State(state): State<Arc<AppState>>,
    Path(path): Path<InventoryPath>,
    query: Result<Query<AsOfQuery>, QueryRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let key = path.key()?;
    let as_of = parse_as_of(query)?;

    let summary = run_blocking(state, move |inventory| inventory.summary_before(&key, as_of)).await?;
    Ok(Json(SummaryResponse::new(key, summary)))
}

/// Ledger entries, newest first.
pub async fn log(
    State(state): State<Arc<AppState>>,
    Path(path): Path<InventoryPath>,
    query: Result<Query<AsOfQuery>, QueryRejection>,
) -> Result<Json<Vec<LedgerEntry>>, ApiError> {
    let key = path.key()?;
    let as_of = parse_as_of(query)?;

    let entries = run_blocking(state, move |inventory| inventory.log_before(&key, as_of)).await?;
    Ok(Json(entries))
}

/// Fallback for unmatched routes.
pub async fn not_found(uri: axum::http::Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}

fn parse_as_of(
    query: Result<Query<AsOfQuery>, QueryRejection>,
) -> Result<Option<chrono::DateTime<chrono::Utc>>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::invalid("as_of", rejection.body_text()))?;
    Ok(validate::optional_as_of(query.as_of.as_deref())?)
}

/// Run an engine call on the blocking pool.
async fn run_blocking<T, F>(state: Arc<AppState>, call: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&inventory_engine::Inventory<dyn inventory_store::Store>) -> inventory_core::Result<T>
        + Send
        + 'static,
{
    tokio::task::spawn_blocking(move || call(state.inventory.as_ref()))
        .await
        .map_err(|e| ApiError::Internal(format!("engine task failed: {e}")))?
        .map_err(ApiError::from)
}
