//! In-memory storage implementation.
//!
//! Every operation takes one mutex over all tables, which makes the
//! conditional insert and the batch commit trivially atomic. Intended for
//! tests and single-process tooling; nothing is persisted.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use inventory_core::{InventoryKey, LedgerEntry, Movement, Summary, TransactionId};

use crate::error::{Result, StoreError};
use crate::record::{LockInsert, LockRecord, StoreOptions};
use crate::Store;

#[derive(Default)]
struct Tables {
    locks: HashMap<InventoryKey, LockRecord>,
    summaries: HashMap<InventoryKey, BTreeMap<TransactionId, Summary>>,
    ledger: HashMap<InventoryKey, BTreeMap<TransactionId, LedgerEntry>>,
}

/// Memory-backed storage implementation.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    options: StoreOptions,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with backend options.
    #[must_use]
    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            tables: Mutex::default(),
            options,
        }
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Database("memory store mutex poisoned".into()))
    }
}

impl Store for MemoryStore {
    fn insert_lock_if_absent(&self, key: &InventoryKey) -> Result<LockInsert> {
        let mut tables = self.tables()?;
        let now = Utc::now();

        let live = tables
            .locks
            .get(key)
            .is_some_and(|record| !record.is_expired(self.options.lock_ttl, now));
        if live {
            return Ok(LockInsert::Rejected);
        }

        tables.locks.insert(*key, LockRecord { acquired_at: now });
        Ok(LockInsert::Applied)
    }

    fn delete_lock(&self, key: &InventoryKey) -> Result<()> {
        self.tables()?.locks.remove(key);
        Ok(())
    }

    fn is_locked(&self, key: &InventoryKey) -> Result<bool> {
        let tables = self.tables()?;
        Ok(tables
            .locks
            .get(key)
            .is_some_and(|record| !record.is_expired(self.options.lock_ttl, Utc::now())))
    }

    fn latest_summary(
        &self,
        key: &InventoryKey,
        before: Option<&TransactionId>,
    ) -> Result<Option<Summary>> {
        let tables = self.tables()?;
        let Some(versions) = tables.summaries.get(key) else {
            return Ok(None);
        };

        let latest = match before {
            Some(cutoff) => versions.range(..*cutoff).next_back(),
            None => versions.iter().next_back(),
        };
        Ok(latest.map(|(_, summary)| summary.clone()))
    }

    fn list_entries(
        &self,
        key: &InventoryKey,
        before: Option<&TransactionId>,
    ) -> Result<Vec<LedgerEntry>> {
        let tables = self.tables()?;
        let Some(entries) = tables.ledger.get(key) else {
            return Ok(Vec::new());
        };

        let entries: Vec<_> = match before {
            Some(cutoff) => entries.range(..*cutoff).rev().map(|(_, e)| e.clone()).collect(),
            None => entries.values().rev().cloned().collect(),
        };
        Ok(entries)
    }

    fn commit(
        &self,
        key: &InventoryKey,
        summary: Summary,
        movement: Movement,
    ) -> Result<(Summary, LedgerEntry)> {
        let (summary, entry) = crate::stamp(summary, movement);

        let mut tables = self.tables()?;
        tables
            .summaries
            .entry(*key)
            .or_default()
            .insert(entry.transaction_id, summary.clone());
        tables
            .ledger
            .entry(*key)
            .or_default()
            .insert(entry.transaction_id, entry.clone());

        Ok((summary, entry))
    }
}
