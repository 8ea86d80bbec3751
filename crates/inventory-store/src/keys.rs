//! Key encoding utilities for `RocksDB`.
//!
//! This module provides functions for encoding and decoding keys used in column families.

use inventory_core::{InventoryKey, TransactionId};

/// Length of a versioned key: inventory key (32 bytes) plus transaction id (16 bytes).
pub const VERSIONED_KEY_LEN: usize = InventoryKey::ENCODED_LEN + 16;

/// Create a lock key.
///
/// Format: `customer_id (16 bytes) || product_id (16 bytes)`
#[must_use]
pub fn lock_key(key: &InventoryKey) -> Vec<u8> {
    key.to_bytes().to_vec()
}

/// Create a prefix for iterating all versions of an inventory key.
#[must_use]
pub fn versions_prefix(key: &InventoryKey) -> Vec<u8> {
    key.to_bytes().to_vec()
}

/// Create a versioned key for the `summaries` and `ledger` column families.
///
/// Format: `customer_id (16 bytes) || product_id (16 bytes) || transaction_id (16 bytes)`
///
/// Since ULIDs are time-ordered, versions of a key sort by time.
#[must_use]
pub fn versioned_key(key: &InventoryKey, transaction_id: &TransactionId) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(VERSIONED_KEY_LEN);
    bytes.extend_from_slice(&key.to_bytes());
    bytes.extend_from_slice(&transaction_id.to_bytes());
    bytes
}

/// Upper seek bound for a reverse scan over the versions of `key`.
///
/// With a cutoff this is the versioned key of the cutoff itself, which the
/// scan must skip; without one it sorts after every version of `key`.
#[must_use]
pub fn reverse_seek_key(key: &InventoryKey, before: Option<&TransactionId>) -> Vec<u8> {
    match before {
        Some(cutoff) => versioned_key(key, cutoff),
        None => {
            let mut bytes = versions_prefix(key);
            bytes.extend_from_slice(&[0xFF; 16]);
            bytes
        }
    }
}

/// Extract the transaction id from a versioned key.
///
/// Returns `None` if the key is not [`VERSIONED_KEY_LEN`] bytes long.
#[must_use]
pub fn extract_transaction_id(bytes: &[u8]) -> Option<TransactionId> {
    if bytes.len() != VERSIONED_KEY_LEN {
        return None;
    }
    let mut id = [0u8; 16];
    id.copy_from_slice(&bytes[InventoryKey::ENCODED_LEN..]);
    Some(TransactionId::from_bytes(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versioned_key_format() {
        let key = InventoryKey::generate();
        let tx_id = TransactionId::generate();
        let bytes = versioned_key(&key, &tx_id);

        assert_eq!(bytes.len(), VERSIONED_KEY_LEN);
        assert_eq!(&bytes[..32], key.to_bytes());
        assert_eq!(&bytes[32..], tx_id.to_bytes());
        assert_eq!(extract_transaction_id(&bytes), Some(tx_id));
    }

    #[test]
    fn versioned_keys_sort_by_transaction() {
        let key = InventoryKey::generate();
        let first = TransactionId::generate();
        let second = TransactionId::generate_after(Some(&first));

        assert!(versioned_key(&key, &first) < versioned_key(&key, &second));
        assert!(versioned_key(&key, &second) < reverse_seek_key(&key, None));
    }

    #[test]
    fn extract_rejects_short_keys() {
        let key = InventoryKey::generate();
        assert_eq!(extract_transaction_id(&lock_key(&key)), None);
    }
}
