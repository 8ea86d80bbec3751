//! Inventory Client SDK.
//!
//! This crate provides a client library for services that record stock
//! movements through the inventory API.
//!
//! # Example
//!
//! ```no_run
//! use inventory_client::InventoryClient;
//! use inventory_core::{Decimal, InventoryKey};
//!
//! # async fn example() -> Result<(), inventory_client::ClientError> {
//! let client = InventoryClient::new("http://inventory.warehouse.svc:3000")?;
//! let key = InventoryKey::generate();
//!
//! client.add(&key, 100, Decimal::from(10), Some("PO-1042")).await?;
//! let summary = client.remove(&key, 40, None).await?;
//!
//! println!("{} units left worth {}", summary.available_quantity, summary.available_value);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, InventoryClient};
pub use error::ClientError;
