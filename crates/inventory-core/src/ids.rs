//! Identifier types for the inventory ledger.
//!
//! Customers and products are identified by UUIDs supplied by the caller.
//! Transactions are identified by ULIDs generated at commit time so that the
//! snapshot and ledger histories of a key sort chronologically.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Create a new identifier from a UUID.
            #[must_use]
            pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Generate a new random identifier (for testing).
            #[must_use]
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Return the bytes of the UUID.
            #[must_use]
            pub fn as_bytes(&self) -> &[u8; 16] {
                self.0.as_bytes()
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = uuid::Uuid::parse_str(s).map_err(|_| IdError::InvalidUuid)?;
                Ok(Self(uuid))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0.to_string()
            }
        }
    };
}

uuid_id!(
    /// A customer identifier (UUID format).
    CustomerId
);

uuid_id!(
    /// A product identifier (UUID format).
    ProductId
);

/// Identifies one independently locked and versioned inventory line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InventoryKey {
    /// Owning customer.
    pub customer_id: CustomerId,
    /// Stocked product.
    pub product_id: ProductId,
}

impl InventoryKey {
    /// Length of the binary encoding returned by [`InventoryKey::to_bytes`].
    pub const ENCODED_LEN: usize = 32;

    /// Create a key from its parts.
    #[must_use]
    pub const fn new(customer_id: CustomerId, product_id: ProductId) -> Self {
        Self {
            customer_id,
            product_id,
        }
    }

    /// Generate a key with random identifiers (for testing).
    #[must_use]
    pub fn generate() -> Self {
        Self::new(CustomerId::generate(), ProductId::generate())
    }

    /// Binary encoding: `customer_id (16 bytes) || product_id (16 bytes)`.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::ENCODED_LEN] {
        let mut bytes = [0u8; Self::ENCODED_LEN];
        bytes[..16].copy_from_slice(self.customer_id.as_bytes());
        bytes[16..].copy_from_slice(self.product_id.as_bytes());
        bytes
    }
}

impl fmt::Display for InventoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.customer_id, self.product_id)
    }
}

/// Largest timestamp a ULID can carry (48 bits of milliseconds).
const MAX_TIMESTAMP_MS: u64 = (1 << 48) - 1;

/// A transaction identifier using ULID for time-ordering.
///
/// A summary version and the ledger entry written alongside it share one
/// `TransactionId`. Ordering of ids is chronological.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransactionId(Ulid);

impl TransactionId {
    /// Create a new `TransactionId` from a ULID.
    #[must_use]
    pub const fn from_ulid(ulid: Ulid) -> Self {
        Self(ulid)
    }

    /// Generate a new `TransactionId` with the current timestamp.
    #[must_use]
    pub fn generate() -> Self {
        Self(Ulid::new())
    }

    /// Generate an id strictly greater than `previous`.
    ///
    /// When the clock has not moved past `previous` (same millisecond, or a
    /// clock step backwards) the previous id is incremented instead.
    #[must_use]
    pub fn generate_after(previous: Option<&TransactionId>) -> Self {
        let fresh = Ulid::new();
        match previous {
            Some(prev) if fresh <= prev.0 => Self(prev.0.increment().unwrap_or(fresh)),
            _ => Self(fresh),
        }
    }

    /// The smallest id carrying timestamp `at`.
    ///
    /// Every id created strictly before `at` (millisecond precision) compares
    /// less than the cutoff; ids created at or after `at` do not.
    ///
    /// Times past the largest ULID timestamp yield the largest id, so every
    /// stored id qualifies.
    #[must_use]
    pub fn cutoff(at: DateTime<Utc>) -> Self {
        let millis = u64::try_from(at.timestamp_millis()).unwrap_or(0);
        if millis > MAX_TIMESTAMP_MS {
            return Self(Ulid::from_parts(MAX_TIMESTAMP_MS, u128::MAX));
        }
        Self(Ulid::from_parts(millis, 0))
    }

    /// Wall-clock time encoded in the id.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        let millis = i64::try_from(self.0.timestamp_ms()).unwrap_or(i64::MAX);
        DateTime::from_timestamp_millis(millis).unwrap_or_default()
    }

    /// Return the bytes of the ULID (16 bytes).
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 16] {
        self.0.to_bytes()
    }

    /// Create a `TransactionId` from bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Ulid::from_bytes(bytes))
    }
}

impl FromStr for TransactionId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ulid = Ulid::from_string(s).map_err(|_| IdError::InvalidUlid)?;
        Ok(Self(ulid))
    }
}

impl fmt::Debug for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionId({})", self.0)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TransactionId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TransactionId> for String {
    fn from(id: TransactionId) -> Self {
        id.0.to_string()
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input is not a valid UUID.
    #[error("invalid UUID format")]
    InvalidUuid,

    /// The input is not a valid ULID.
    #[error("invalid ULID format")]
    InvalidUlid,
}
