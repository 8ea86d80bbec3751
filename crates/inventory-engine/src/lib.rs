//! Inventory accounting engine.
//!
//! This crate ties the store primitives and the core accounting rules into the
//! four operations exposed to callers:
//!
//! - `add`: append a lot under the key's lock
//! - `remove`: deplete lots FIFO under the key's lock
//! - `summary`: read the current or a point-in-time summary, lock-free
//! - `log`: read the ledger, newest first, lock-free
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use inventory_core::{Decimal, InventoryKey};
//! use inventory_engine::Inventory;
//! use inventory_store::MemoryStore;
//!
//! let inventory = Inventory::new(Arc::new(MemoryStore::new()));
//! let key = InventoryKey::generate();
//!
//! inventory.add(&key, 100, Decimal::from(10), None).unwrap();
//! let summary = inventory.remove(&key, 40, None).unwrap();
//! assert_eq!(summary.available_quantity, 60);
//! assert_eq!(summary.sold_value, Decimal::from(400));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod engine;
pub mod lock;

pub use engine::Inventory;
pub use lock::{LockCoordinator, LockGuard};
