//! Stock lots.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{InventoryError, Result};

/// A quantity of stock acquired at one unit price.
///
/// Lots are both the elements of a summary's FIFO queue and the movement
/// records of a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
    /// Number of units.
    pub quantity: u64,
    /// Price paid per unit.
    pub unit_price: Decimal,
}

impl Lot {
    /// Create a lot.
    #[must_use]
    pub const fn new(quantity: u64, unit_price: Decimal) -> Self {
        Self {
            quantity,
            unit_price,
        }
    }

    /// Total value of the lot (`quantity × unit_price`).
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::Internal` if the product overflows `Decimal`.
    pub fn value(&self) -> Result<Decimal> {
        Decimal::from(self.quantity)
            .checked_mul(self.unit_price)
            .map(|value| value.normalize())
            .ok_or_else(|| {
                InventoryError::Internal(format!(
                    "lot value overflow: {} x {}",
                    self.quantity, self.unit_price
                ))
            })
    }
}
