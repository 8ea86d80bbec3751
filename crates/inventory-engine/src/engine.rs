//! The inventory accounting engine.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use inventory_core::{
    validate, Decimal, InventoryKey, LedgerEntry, Lot, Movement, Result, Summary, TransactionId,
};
use inventory_store::Store;

use crate::lock::LockCoordinator;

/// Orchestrates validation, locking, FIFO accounting and persistence.
///
/// Mutations (`add`, `remove`) run under the key's lock and fail fast when it
/// is held. Reads (`summary`, `log`) never lock.
pub struct Inventory<S: ?Sized> {
    store: Arc<S>,
    locks: LockCoordinator<S>,
}

impl<S: Store + ?Sized> Inventory<S> {
    /// Create an engine over `store`.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        let locks = LockCoordinator::new(Arc::clone(&store));
        Self { store, locks }
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The lock coordinator used by mutations.
    #[must_use]
    pub fn locks(&self) -> &LockCoordinator<S> {
        &self.locks
    }

    /// Add `quantity` units bought at `unit_price` as a new lot.
    ///
    /// # Errors
    ///
    /// - `InvalidValue` for a zero quantity or negative price (no lock taken).
    /// - `Locked` if another mutation holds the key.
    /// - `Internal` on store failure.
    pub fn add(
        &self,
        key: &InventoryKey,
        quantity: u64,
        unit_price: Decimal,
        info: Option<String>,
    ) -> Result<Summary> {
        let quantity = validate::positive_quantity(quantity)?;
        let unit_price = validate::non_negative_price(unit_price)?;
        let lot = Lot::new(quantity, unit_price);

        self.mutate(key, info, |summary| summary.add(lot))
    }

    /// Remove `quantity` units, oldest lots first.
    ///
    /// # Errors
    ///
    /// - `InvalidValue` for a zero quantity (no lock taken).
    /// - `Locked` if another mutation holds the key.
    /// - `NotAvailable` if fewer than `quantity` units are available.
    /// - `Internal` on store failure.
    pub fn remove(
        &self,
        key: &InventoryKey,
        quantity: u64,
        info: Option<String>,
    ) -> Result<Summary> {
        let quantity = validate::positive_quantity(quantity)?;

        self.mutate(key, info, |summary| summary.remove(quantity))
    }

    /// The current summary, or the one visible strictly before `as_of`.
    ///
    /// `as_of` is parsed with [`validate::as_of`].
    ///
    /// # Errors
    ///
    /// - `InvalidValue` if `as_of` cannot be parsed.
    /// - `Internal` on store failure.
    pub fn summary(&self, key: &InventoryKey, as_of: Option<&str>) -> Result<Summary> {
        let as_of = validate::optional_as_of(as_of)?;
        self.summary_before(key, as_of)
    }

    /// Like [`Inventory::summary`] with an already parsed cutoff.
    ///
    /// # Errors
    ///
    /// Returns `Internal` on store failure.
    pub fn summary_before(
        &self,
        key: &InventoryKey,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Summary> {
        let cutoff = as_of.map(TransactionId::cutoff);
        Ok(self
            .store
            .latest_summary(key, cutoff.as_ref())?
            .unwrap_or_default())
    }

    /// All ledger entries, newest first, optionally only those strictly
    /// before `as_of`.
    ///
    /// # Errors
    ///
    /// - `InvalidValue` if `as_of` cannot be parsed.
    /// - `Internal` on store failure.
    pub fn log(&self, key: &InventoryKey, as_of: Option<&str>) -> Result<Vec<LedgerEntry>> {
        let as_of = validate::optional_as_of(as_of)?;
        self.log_before(key, as_of)
    }

    /// Like [`Inventory::log`] with an already parsed cutoff.
    ///
    /// # Errors
    ///
    /// Returns `Internal` on store failure.
    pub fn log_before(
        &self,
        key: &InventoryKey,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Vec<LedgerEntry>> {
        let cutoff = as_of.map(TransactionId::cutoff);
        Ok(self.store.list_entries(key, cutoff.as_ref())?)
    }

    /// Lock, apply `change` to the current summary, commit, unlock.
    ///
    /// The lock guard lives until the end of this function, so the lock is
    /// released on every path after acquisition, including errors.
    fn mutate<F>(&self, key: &InventoryKey, info: Option<String>, change: F) -> Result<Summary>
    where
        F: FnOnce(&mut Summary) -> Result<Movement>,
    {
        let _guard = self.locks.acquire(key)?;

        let mut summary = self.store.latest_summary(key, None)?.unwrap_or_default();
        let movement = change(&mut summary)?.with_info(info);
        let operation = movement.operation;
        let quantity = movement.quantity();

        let (summary, entry) = self.store.commit(key, summary, movement)?;

        tracing::info!(
            customer_id = %key.customer_id,
            product_id = %key.product_id,
            transaction_id = %entry.transaction_id,
            operation = %operation,
            quantity = quantity,
            available_quantity = summary.available_quantity,
            "Inventory updated"
        );

        Ok(summary)
    }
}
