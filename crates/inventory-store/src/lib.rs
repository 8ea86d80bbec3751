//! Storage layer for the inventory ledger.
//!
//! The engine treats storage as a row store with three write primitives:
//! a conditional insert (the lock), an unconditional delete (the unlock), and
//! an atomic batch write (summary version + ledger entry). Reads are
//! "latest snapshot before a cutoff" and "ledger entries before a cutoff",
//! both ordered by transaction id.
//!
//! # Architecture
//!
//! [`RocksStore`] keeps three column families:
//!
//! - `locks`: lock markers, keyed by `customer_id || product_id`
//! - `summaries`: summary versions, keyed by `customer_id || product_id || transaction_id`
//! - `ledger`: ledger entries, keyed like `summaries`
//!
//! Because transaction ids are ULIDs, a reverse scan over a key prefix walks
//! versions newest first.
//!
//! [`MemoryStore`] implements the same contract in process memory.
//!
//! # Example
//!
//! ```no_run
//! use inventory_core::{InventoryKey, Lot, Decimal, Summary};
//! use inventory_store::{RocksStore, Store};
//!
//! let store = RocksStore::open("/tmp/inventory-db").unwrap();
//! let key = InventoryKey::generate();
//!
//! let mut summary = Summary::empty();
//! let movement = summary.add(Lot::new(100, Decimal::from(10))).unwrap();
//! let (summary, entry) = store.commit(&key, summary, movement).unwrap();
//! assert_eq!(summary.as_of, Some(entry.transaction_id));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
#[cfg(feature = "rocksdb-backend")]
pub mod keys;
pub mod memory;
pub mod record;
#[cfg(feature = "rocksdb-backend")]
pub mod rocks;
#[cfg(feature = "rocksdb-backend")]
pub mod schema;

#[cfg(test)]
mod conformance;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use record::{LockInsert, LockRecord, StoreOptions};
#[cfg(feature = "rocksdb-backend")]
pub use rocks::RocksStore;

use inventory_core::{InventoryKey, LedgerEntry, Movement, Summary, TransactionId};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations (`RocksDB`, in-memory for testing).
pub trait Store: Send + Sync {
    // =========================================================================
    // Lock Operations
    // =========================================================================

    /// Insert the lock marker for `key` unless one already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn insert_lock_if_absent(&self, key: &InventoryKey) -> Result<LockInsert>;

    /// Delete the lock marker for `key`. Deleting a missing marker succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn delete_lock(&self, key: &InventoryKey) -> Result<()>;

    /// Whether a live lock marker exists for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn is_locked(&self, key: &InventoryKey) -> Result<bool>;

    // =========================================================================
    // Snapshot and Ledger Reads
    // =========================================================================

    /// The most recent summary version for `key`, restricted to versions whose
    /// transaction id is strictly less than `before` when given.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails or a stored record
    /// cannot be decoded.
    fn latest_summary(
        &self,
        key: &InventoryKey,
        before: Option<&TransactionId>,
    ) -> Result<Option<Summary>>;

    /// All ledger entries for `key`, newest first, restricted to entries whose
    /// transaction id is strictly less than `before` when given.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails or a stored record
    /// cannot be decoded.
    fn list_entries(
        &self,
        key: &InventoryKey,
        before: Option<&TransactionId>,
    ) -> Result<Vec<LedgerEntry>>;

    // =========================================================================
    // Compound Operations
    // =========================================================================

    /// Write a new summary version and its ledger entry atomically.
    ///
    /// The store generates a transaction id strictly greater than
    /// `summary.as_of` (the version the summary was computed from), stamps it
    /// on both records and writes them in one batch. Returns the stamped pair.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the batch write fails; nothing is
    /// written in that case.
    fn commit(
        &self,
        key: &InventoryKey,
        summary: Summary,
        movement: Movement,
    ) -> Result<(Summary, LedgerEntry)>;
}

/// Stamp a freshly computed pair with the next transaction id.
fn stamp(summary: Summary, movement: Movement) -> (Summary, LedgerEntry) {
    let transaction_id = TransactionId::generate_after(summary.as_of.as_ref());
    let summary = Summary {
        as_of: Some(transaction_id),
        ..summary
    };
    (summary, movement.into_entry(transaction_id))
}
