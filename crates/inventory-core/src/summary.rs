//! Inventory summaries and the FIFO accounting rules.
//!
//! A [`Summary`] is one immutable version of an inventory line. Mutations are
//! computed on a copy of the current version; the result is committed as a new
//! version and the old one is never touched again.

use std::collections::VecDeque;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{InventoryError, Result};
use crate::ledger::{Movement, Operation};
use crate::lot::Lot;
use crate::TransactionId;

/// One version of an inventory line.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    /// Unsold lots, oldest first.
    pub available: VecDeque<Lot>,
    /// Sum of `available` quantities.
    pub available_quantity: u64,
    /// Sum of `available` values.
    pub available_value: Decimal,
    /// Units removed over the line's lifetime.
    pub sold_quantity: u64,
    /// Value removed over the line's lifetime, at acquisition prices.
    pub sold_value: Decimal,
    /// Units ever added.
    pub total_quantity: u64,
    /// Value ever added.
    pub total_value: Decimal,
    /// Transaction that produced this version; `None` for the empty summary.
    pub as_of: Option<TransactionId>,
}

impl Summary {
    /// The summary of a line that has never been mutated.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a lot at the back of the queue.
    ///
    /// Returns the movement to record alongside the new version. `self` is
    /// left untouched on error.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::Internal` if a running total overflows.
    pub fn add(&mut self, lot: Lot) -> Result<Movement> {
        let value = lot.value()?;
        let available_quantity = checked_add_qty(self.available_quantity, lot.quantity)?;
        let total_quantity = checked_add_qty(self.total_quantity, lot.quantity)?;
        let available_value = checked_add_value(self.available_value, value)?;
        let total_value = checked_add_value(self.total_value, value)?;

        self.available.push_back(lot.clone());
        self.available_quantity = available_quantity;
        self.available_value = available_value;
        self.total_quantity = total_quantity;
        self.total_value = total_value;

        Ok(Movement {
            operation: Operation::Add,
            records: vec![lot],
            info: None,
        })
    }

    /// Remove `quantity` units, depleting the oldest lots first.
    ///
    /// A lot larger than the remaining amount is split: it stays at the front
    /// with its quantity reduced. A lot consumed exactly is dropped. Each
    /// consumed slice becomes one record, in consumption order. Totals are
    /// unchanged. `self` is left untouched on error.
    ///
    /// # Errors
    ///
    /// - `InventoryError::NotAvailable` if `quantity` exceeds
    ///   `available_quantity`.
    /// - `InventoryError::Internal` if the lots do not cover
    ///   `available_quantity` or a total overflows.
    pub fn remove(&mut self, quantity: u64) -> Result<Movement> {
        if quantity > self.available_quantity {
            return Err(InventoryError::NotAvailable {
                available: self.available_quantity,
                requested: quantity,
            });
        }

        let mut available = self.available.clone();
        let mut records = Vec::new();
        let mut removed_value = Decimal::ZERO;
        let mut remaining = quantity;

        while remaining > 0 {
            let Some(front) = available.front_mut() else {
                return Err(InventoryError::Internal(format!(
                    "available lots cover less than available_quantity={}",
                    self.available_quantity
                )));
            };

            let taken = remaining.min(front.quantity);
            let record = Lot::new(taken, front.unit_price);
            if taken == front.quantity {
                available.pop_front();
            } else {
                front.quantity -= taken;
            }

            removed_value = checked_add_value(removed_value, record.value()?)?;
            remaining -= taken;
            records.push(record);
        }

        let sold_quantity = checked_add_qty(self.sold_quantity, quantity)?;
        let sold_value = checked_add_value(self.sold_value, removed_value)?;

        self.available = available;
        self.available_quantity -= quantity;
        self.available_value = (self.available_value - removed_value).normalize();
        self.sold_quantity = sold_quantity;
        self.sold_value = sold_value;

        Ok(Movement {
            operation: Operation::Remove,
            records,
            info: None,
        })
    }

    /// Check the accounting identities between the lots and the totals.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let lots_quantity = self
            .available
            .iter()
            .try_fold(0u64, |acc, lot| acc.checked_add(lot.quantity));
        let lots_value = self
            .available
            .iter()
            .try_fold(Decimal::ZERO, |acc, lot| acc.checked_add(lot.value().ok()?));

        lots_quantity == Some(self.available_quantity)
            && lots_value == Some(self.available_value)
            && self.available_quantity.checked_add(self.sold_quantity) == Some(self.total_quantity)
            && self.available_value.checked_add(self.sold_value) == Some(self.total_value)
    }
}

fn checked_add_qty(current: u64, delta: u64) -> Result<u64> {
    current
        .checked_add(delta)
        .ok_or_else(|| InventoryError::Internal(format!("quantity overflow: {current} + {delta}")))
}

fn checked_add_value(current: Decimal, delta: Decimal) -> Result<Decimal> {
    current
        .checked_add(delta)
        .map(|value| value.normalize())
        .ok_or_else(|| InventoryError::Internal(format!("value overflow: {current} + {delta}")))
}
