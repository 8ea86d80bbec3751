//! Per-key mutual exclusion on top of the store's conditional insert.
//!
//! A lock is nothing more than the existence of a row. There is no owner token
//! and no expiry at this layer; staleness is the store's concern.

use std::sync::Arc;

use inventory_core::{InventoryError, InventoryKey, Result};
use inventory_store::{LockInsert, Store};

/// Acquires and releases inventory locks.
pub struct LockCoordinator<S: ?Sized> {
    store: Arc<S>,
}

impl<S: Store + ?Sized> LockCoordinator<S> {
    /// Create a coordinator over `store`.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Take the lock for `key`.
    ///
    /// The returned guard releases the lock when dropped.
    ///
    /// # Errors
    ///
    /// - `InventoryError::Locked` if the lock is already held.
    /// - `InventoryError::Internal` if the store fails or cannot confirm the
    ///   insert. Nothing is released in either case.
    pub fn acquire(&self, key: &InventoryKey) -> Result<LockGuard<'_, S>> {
        match self.store.insert_lock_if_absent(key)? {
            LockInsert::Applied => {
                tracing::debug!(
                    customer_id = %key.customer_id,
                    product_id = %key.product_id,
                    "Inventory lock acquired"
                );
                Ok(LockGuard {
                    coordinator: self,
                    key: *key,
                    released: false,
                })
            }
            LockInsert::Rejected => Err(InventoryError::Locked { key: *key }),
            LockInsert::Unconfirmed => Err(InventoryError::Internal(
                "lock insert returned no confirmation".into(),
            )),
        }
    }

    /// Delete the lock for `key`. Releasing a lock that is not held succeeds.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::Internal` if the store fails.
    pub fn release(&self, key: &InventoryKey) -> Result<()> {
        self.store.delete_lock(key)?;
        tracing::debug!(
            customer_id = %key.customer_id,
            product_id = %key.product_id,
            "Inventory lock released"
        );
        Ok(())
    }
}

/// A held inventory lock.
///
/// Dropping the guard releases the lock; a failed release is logged and
/// otherwise ignored so it never replaces the outcome of the locked work.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct LockGuard<'a, S: Store + ?Sized> {
    coordinator: &'a LockCoordinator<S>,
    key: InventoryKey,
    released: bool,
}

impl<S: Store + ?Sized> LockGuard<'_, S> {
    /// The locked key.
    #[must_use]
    pub fn key(&self) -> &InventoryKey {
        &self.key
    }

    /// Release the lock now and report the outcome.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::Internal` if the store fails to delete the lock.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        self.coordinator.release(&self.key)
    }
}

impl<S: Store + ?Sized> Drop for LockGuard<'_, S> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.coordinator.release(&self.key) {
            tracing::warn!(
                error = %e,
                customer_id = %self.key.customer_id,
                product_id = %self.key.product_id,
                "Failed to release inventory lock"
            );
        }
    }
}
