//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};

use inventory_core::{InventoryKey, LedgerEntry, Movement, Summary, TransactionId};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::record::{LockInsert, LockRecord, StoreOptions};
use crate::schema::{all_column_families, cf};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    options: StoreOptions,
    /// Serializes the read-check-write of conditional lock inserts.
    lock_writes: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, StoreOptions::default())
    }

    /// Open or create a `RocksDB` database with backend options.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: StoreOptions) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            options,
            lock_writes: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Read the live lock record for `key`, if any.
    fn live_lock(&self, key: &InventoryKey) -> Result<Option<LockRecord>> {
        let cf = self.cf(cf::LOCKS)?;
        let record: Option<LockRecord> = self
            .db
            .get_cf(&cf, keys::lock_key(key))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()?;

        Ok(record.filter(|record| !record.is_expired(self.options.lock_ttl, Utc::now())))
    }

    /// Walk the versions of `key` in one column family, newest first.
    fn scan_versions<T: serde::de::DeserializeOwned>(
        &self,
        cf_name: &str,
        key: &InventoryKey,
        before: Option<&TransactionId>,
        limit: Option<usize>,
    ) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let prefix = keys::versions_prefix(key);
        let seek = keys::reverse_seek_key(key, before);

        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(&seek, Direction::Reverse));

        let mut items = Vec::new();
        for item in iter {
            let (row_key, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            if !row_key.starts_with(&prefix) {
                break;
            }

            // The cutoff key itself is not strictly before the cutoff.
            if before.is_some() && row_key[..] >= seek[..] {
                continue;
            }

            items.push(Self::deserialize(&value)?);

            if limit.is_some_and(|limit| items.len() >= limit) {
                break;
            }
        }

        Ok(items)
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Lock Operations
    // =========================================================================

    fn insert_lock_if_absent(&self, key: &InventoryKey) -> Result<LockInsert> {
        let cf = self.cf(cf::LOCKS)?;
        let lock_key = keys::lock_key(key);

        let _guard = self
            .lock_writes
            .lock()
            .map_err(|_| StoreError::Database("lock table mutex poisoned".into()))?;

        if let Some(existing) = self
            .db
            .get_cf(&cf, &lock_key)
            .map_err(|e| StoreError::Database(e.to_string()))?
        {
            let record: LockRecord = Self::deserialize(&existing)?;
            if !record.is_expired(self.options.lock_ttl, Utc::now()) {
                return Ok(LockInsert::Rejected);
            }
            tracing::warn!(
                key = %key,
                acquired_at = %record.acquired_at,
                "Replacing expired inventory lock"
            );
        }

        let value = Self::serialize(&LockRecord::now())?;
        self.db
            .put_cf(&cf, &lock_key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(LockInsert::Applied)
    }

    fn delete_lock(&self, key: &InventoryKey) -> Result<()> {
        let cf = self.cf(cf::LOCKS)?;

        self.db
            .delete_cf(&cf, keys::lock_key(key))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn is_locked(&self, key: &InventoryKey) -> Result<bool> {
        Ok(self.live_lock(key)?.is_some())
    }

    // =========================================================================
    // Snapshot and Ledger Reads
    // =========================================================================

    fn latest_summary(
        &self,
        key: &InventoryKey,
        before: Option<&TransactionId>,
    ) -> Result<Option<Summary>> {
        Ok(self
            .scan_versions(cf::SUMMARIES, key, before, Some(1))?
            .into_iter()
            .next())
    }

    fn list_entries(
        &self,
        key: &InventoryKey,
        before: Option<&TransactionId>,
    ) -> Result<Vec<LedgerEntry>> {
        self.scan_versions(cf::LEDGER, key, before, None)
    }

    // =========================================================================
    // Compound Operations
    // =========================================================================

    fn commit(
        &self,
        key: &InventoryKey,
        summary: Summary,
        movement: Movement,
    ) -> Result<(Summary, LedgerEntry)> {
        let (summary, entry) = crate::stamp(summary, movement);

        let cf_summaries = self.cf(cf::SUMMARIES)?;
        let cf_ledger = self.cf(cf::LEDGER)?;

        let row_key = keys::versioned_key(key, &entry.transaction_id);
        let summary_value = Self::serialize(&summary)?;
        let entry_value = Self::serialize(&entry)?;

        // Write atomically
        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_summaries, &row_key, &summary_value);
        batch.put_cf(&cf_ledger, &row_key, &entry_value);

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok((summary, entry))
    }
}
