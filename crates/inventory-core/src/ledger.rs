//! Ledger entries: the immutable record of each stock movement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::InventoryError;
use crate::lot::Lot;
use crate::TransactionId;

/// Kind of stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Stock was added as a new lot.
    Add,
    /// Stock was removed, oldest lots first.
    Remove,
}

impl Operation {
    /// Wire name of the operation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }
}

impl FromStr for Operation {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "remove" | "rm" => Ok(Self::Remove),
            other => Err(InventoryError::invalid("operation", other)),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A computed movement that has not been committed yet.
///
/// The store turns it into a [`LedgerEntry`] by stamping the transaction id it
/// generates for the commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    /// Kind of movement.
    pub operation: Operation,
    /// Moved lots in application order.
    pub records: Vec<Lot>,
    /// Free-form annotation supplied by the caller.
    pub info: Option<String>,
}

impl Movement {
    /// Attach a caller annotation.
    #[must_use]
    pub fn with_info(mut self, info: Option<String>) -> Self {
        self.info = info;
        self
    }

    /// Total units moved.
    #[must_use]
    pub fn quantity(&self) -> u64 {
        self.records.iter().map(|lot| lot.quantity).sum()
    }

    /// Stamp the movement with its transaction id.
    #[must_use]
    pub fn into_entry(self, transaction_id: TransactionId) -> LedgerEntry {
        LedgerEntry {
            transaction_id,
            operation: self.operation,
            records: self.records,
            info: self.info,
        }
    }
}

/// One committed movement, sharing its transaction id with the summary
/// version written alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Transaction that produced this entry.
    pub transaction_id: TransactionId,
    /// Kind of movement.
    pub operation: Operation,
    /// Moved lots; for removals, in consumption order (oldest lot first).
    pub records: Vec<Lot>,
    /// Free-form annotation supplied by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

impl LedgerEntry {
    /// When the entry was committed.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.transaction_id.timestamp()
    }
}
