//! Behaviour every `Store` backend must share, run by each backend's tests.

use chrono::Duration;
use inventory_core::{Decimal, InventoryKey, Lot, Operation, Summary, TransactionId};

use crate::{LockInsert, Store};

/// Commit an add of `quantity @ price` on top of the latest version of `key`.
fn add(store: &dyn Store, key: &InventoryKey, quantity: u64, price: i64) -> Summary {
    let mut summary = store.latest_summary(key, None).unwrap().unwrap_or_default();
    let movement = summary.add(Lot::new(quantity, Decimal::from(price))).unwrap();
    store.commit(key, summary, movement).unwrap().0
}

pub fn lock_is_conditional(store: &dyn Store) {
    let key = InventoryKey::generate();

    assert!(!store.is_locked(&key).unwrap());
    assert_eq!(store.insert_lock_if_absent(&key).unwrap(), LockInsert::Applied);
    assert!(store.is_locked(&key).unwrap());
    assert_eq!(store.insert_lock_if_absent(&key).unwrap(), LockInsert::Rejected);

    store.delete_lock(&key).unwrap();
    assert!(!store.is_locked(&key).unwrap());

    // Deleting a missing lock is not an error
    store.delete_lock(&key).unwrap();

    assert_eq!(store.insert_lock_if_absent(&key).unwrap(), LockInsert::Applied);
}

pub fn commit_writes_summary_and_entry(store: &dyn Store) {
    let key = InventoryKey::generate();
    assert!(store.latest_summary(&key, None).unwrap().is_none());
    assert!(store.list_entries(&key, None).unwrap().is_empty());

    let first = add(store, &key, 100, 10);
    let second = add(store, &key, 250, 15);

    let first_id = first.as_of.unwrap();
    let second_id = second.as_of.unwrap();
    assert!(second_id > first_id);

    let latest = store.latest_summary(&key, None).unwrap().unwrap();
    assert_eq!(latest, second);
    assert_eq!(latest.available_quantity, 350);

    let entries = store.list_entries(&key, None).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].transaction_id, second_id);
    assert_eq!(entries[1].transaction_id, first_id);
    assert_eq!(entries[0].operation, Operation::Add);
    assert_eq!(entries[0].records, vec![Lot::new(250, Decimal::from(15))]);
}

pub fn reads_respect_cutoff(store: &dyn Store) {
    let key = InventoryKey::generate();
    let first = add(store, &key, 1, 1);
    std::thread::sleep(std::time::Duration::from_millis(3));
    let second = add(store, &key, 2, 1);
    std::thread::sleep(std::time::Duration::from_millis(3));
    let third = add(store, &key, 3, 1);

    let t1 = first.as_of.unwrap().timestamp();
    let t2 = second.as_of.unwrap().timestamp();
    let t3 = third.as_of.unwrap().timestamp();

    // Strictly before the first transaction: nothing
    let cutoff = TransactionId::cutoff(t1);
    assert!(store.latest_summary(&key, Some(&cutoff)).unwrap().is_none());
    assert!(store.list_entries(&key, Some(&cutoff)).unwrap().is_empty());

    // Just after the second transaction: the second version
    let cutoff = TransactionId::cutoff(t2 + Duration::milliseconds(1));
    assert_eq!(store.latest_summary(&key, Some(&cutoff)).unwrap(), Some(second.clone()));
    assert_eq!(store.list_entries(&key, Some(&cutoff)).unwrap().len(), 2);

    // At the third transaction's millisecond: still the second version
    let cutoff = TransactionId::cutoff(t3);
    assert_eq!(store.latest_summary(&key, Some(&cutoff)).unwrap(), Some(second));

    // Far future: everything
    let cutoff = TransactionId::cutoff(t3 + Duration::days(1));
    assert_eq!(store.latest_summary(&key, Some(&cutoff)).unwrap(), Some(third));
    assert_eq!(store.list_entries(&key, Some(&cutoff)).unwrap().len(), 3);
}

pub fn keys_are_isolated(store: &dyn Store) {
    let left = InventoryKey::generate();
    let right = InventoryKey::new(left.customer_id, inventory_core::ProductId::generate());

    add(store, &left, 5, 1);
    store.insert_lock_if_absent(&left).unwrap();

    assert!(store.latest_summary(&right, None).unwrap().is_none());
    assert!(store.list_entries(&right, None).unwrap().is_empty());
    assert!(!store.is_locked(&right).unwrap());
    assert_eq!(store.insert_lock_if_absent(&right).unwrap(), LockInsert::Applied);
}

pub fn zero_ttl_lock_never_blocks(store: &dyn Store) {
    let key = InventoryKey::generate();
    assert_eq!(store.insert_lock_if_absent(&key).unwrap(), LockInsert::Applied);
    assert!(!store.is_locked(&key).unwrap());
    assert_eq!(store.insert_lock_if_absent(&key).unwrap(), LockInsert::Applied);
}
