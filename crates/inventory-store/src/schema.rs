//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Lock markers, keyed by `customer_id || product_id`.
    pub const LOCKS: &str = "locks";

    /// Summary versions, keyed by `customer_id || product_id || transaction_id`.
    pub const SUMMARIES: &str = "summaries";

    /// Ledger entries, keyed by `customer_id || product_id || transaction_id`.
    pub const LEDGER: &str = "ledger";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::LOCKS, cf::SUMMARIES, cf::LEDGER]
}
