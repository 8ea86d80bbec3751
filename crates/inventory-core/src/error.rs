//! Error types for the inventory ledger.

use crate::ids::InventoryKey;

/// Result type for inventory operations.
pub type Result<T> = std::result::Result<T, InventoryError>;

/// Errors surfaced by inventory operations.
///
/// The set is closed: transport layers map each variant to one protocol
/// response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    /// Malformed input, detected before touching the store.
    #[error("invalid value {value} for field {field}")]
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
        /// The offending value, as received.
        value: String,
    },

    /// Another mutation currently holds the lock for this key.
    #[error("inventory for {key} is currently locked")]
    Locked {
        /// The contended key.
        key: InventoryKey,
    },

    /// Removal requested more than is available.
    #[error("unable to remove more items than available: available={available}, requested={requested}")]
    NotAvailable {
        /// Quantity currently available.
        available: u64,
        /// Quantity requested for removal.
        requested: u64,
    },

    /// The store failed or answered with an unexpected shape.
    #[error("internal error: {0}")]
    Internal(String),
}

impl InventoryError {
    /// Build an [`InventoryError::InvalidValue`].
    pub fn invalid(field: &'static str, value: impl ToString) -> Self {
        Self::InvalidValue {
            field,
            value: value.to_string(),
        }
    }

    /// Stable machine-readable code for this error kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidValue { .. } => "invalid_value",
            Self::Locked { .. } => "locked",
            Self::NotAvailable { .. } => "not_available",
            Self::Internal(_) => "internal_error",
        }
    }
}
