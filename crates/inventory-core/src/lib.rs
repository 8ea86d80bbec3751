//! Core types and accounting rules for the inventory ledger.
//!
//! This crate provides the foundational types used throughout the workspace:
//!
//! - **Identifiers**: `CustomerId`, `ProductId`, `InventoryKey`, `TransactionId`
//! - **Lots**: `Lot`, one batch of stock at one unit price
//! - **Summaries**: `Summary`, a versioned snapshot with FIFO add/remove rules
//! - **Ledger**: `LedgerEntry`, `Movement`, `Operation`
//! - **Validation**: parsing of caller-supplied quantities, prices and cutoffs
//! - **Errors**: `InventoryError`, the closed set of failure kinds
//!
//! # Values
//!
//! Quantities are whole units (`u64`). Prices and values are `Decimal`, so the
//! accounting identities between lots and totals hold exactly.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod ids;
pub mod ledger;
pub mod lot;
pub mod summary;
pub mod validate;

pub use error::{InventoryError, Result};
pub use ids::{CustomerId, IdError, InventoryKey, ProductId, TransactionId};
pub use ledger::{LedgerEntry, Movement, Operation};
pub use lot::Lot;
pub use rust_decimal::Decimal;
pub use summary::Summary;
