use std::collections::HashSet;

use crate::models::{CategoryRef, Transaction, TransactionId};

/// Assign a category to the transaction with `id`.
///
/// The category is not checked against the category store. Returns false when
/// no transaction matches, which is not an error.
pub fn assign(transactions: &mut [Transaction], id: &TransactionId, category: CategoryRef) -> bool {
    match transactions.iter_mut().find(|tx| &tx.id == id) {
        Some(tx) => {
            tx.category = category;
            true
        }
        None => false,
    }
}

/// Assign one category to every transaction whose id is in `ids`.
///
/// Clearing the selection afterwards is up to the caller. Returns the number
/// of transactions updated.
pub fn bulk_assign(
    transactions: &mut [Transaction],
    ids: &HashSet<TransactionId>,
    category: CategoryRef,
) -> usize {
    let mut updated = 0;
    for tx in transactions.iter_mut().filter(|tx| ids.contains(&tx.id)) {
        tx.category = category.clone();
        updated += 1;
    }
    updated
}
