use std::collections::HashSet;

use financer::assignment::{assign, bulk_assign};
use financer::models::{CategoryRef, Transaction, TransactionId};

fn txs(n: usize) -> Vec<Transaction> {
    (0..n).map(|i| Transaction::new(format!("tx-{i}"))).collect()
}

#[test]
fn test_assign_sets_only_matching_transaction() {
    let mut list = txs(3);
    assert!(assign(&mut list, &TransactionId::from("tx-1"), CategoryRef::from_wire("food")));
    assert!(list[0].category.is_uncategorized());
    assert_eq!(list[1].category.as_wire(), "food");
    assert!(list[2].category.is_uncategorized());
}

#[test]
fn test_assign_empty_normalizes_to_uncategorized() {
    let mut list = txs(1);
    assign(&mut list, &TransactionId::from("tx-0"), CategoryRef::from_wire("food"));
    assign(&mut list, &TransactionId::from("tx-0"), CategoryRef::from_wire(""));
    assert_eq!(list[0].category, CategoryRef::Uncategorized);
}

#[test]
fn test_assign_unknown_id_is_noop() {
    let mut list = txs(2);
    let before = list.clone();
    assert!(!assign(&mut list, &TransactionId::from("nope"), CategoryRef::from_wire("food")));
    assert_eq!(list, before);
}

#[test]
fn test_assign_accepts_dangling_category() {
    let mut list = txs(1);
    assign(&mut list, &TransactionId::from("tx-0"), CategoryRef::from_wire("ghost"));
    assert_eq!(list[0].category.as_wire(), "ghost");
}

#[test]
fn test_bulk_assign_touches_only_selected() {
    let mut list = txs(4);
    let ids: HashSet<TransactionId> = ["tx-0", "tx-2", "missing"].into_iter().map(TransactionId::from).collect();

    let updated = bulk_assign(&mut list, &ids, CategoryRef::from_wire("rent"));

    assert_eq!(updated, 2);
    for tx in &list {
        if ids.contains(&tx.id) {
            assert_eq!(tx.category.as_wire(), "rent");
        } else {
            assert!(tx.category.is_uncategorized());
        }
    }
}

#[test]
fn test_bulk_assign_empty_set_changes_nothing() {
    let mut list = txs(2);
    assert_eq!(bulk_assign(&mut list, &HashSet::new(), CategoryRef::from_wire("x")), 0);
    assert!(list.iter().all(|tx| tx.category.is_uncategorized()));
}
