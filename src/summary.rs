use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::models::{Category, CategoryId, CategoryRef, Transaction};

/// Display name for transactions without a (resolvable) category
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Totals for one category
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub category: CategoryRef,
    pub name: String,
    pub count: usize,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    /// `total_credit - total_debit`
    pub net: Decimal,
}

impl SummaryRow {
    fn empty(category: CategoryRef, name: &str) -> Self {
        Self {
            category,
            name: name.to_string(),
            count: 0,
            total_debit: Decimal::ZERO,
            total_credit: Decimal::ZERO,
            net: Decimal::ZERO,
        }
    }
}

// Output form with amounts fixed at two decimal places
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryRowSerialized<'a> {
    category_id: &'a str,
    name: &'a str,
    count: usize,
    total_debit: Decimal,
    total_credit: Decimal,
    net: Decimal,
}

fn two_places(amount: Decimal) -> Decimal {
    let mut amount = amount.round_dp(2);
    amount.rescale(2);
    amount
}

impl Serialize for SummaryRow {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        SummaryRowSerialized {
            category_id: self.category.as_wire(),
            name: &self.name,
            count: self.count,
            total_debit: two_places(self.total_debit),
            total_credit: two_places(self.total_credit),
            net: two_places(self.net),
        }
        .serialize(serializer)
    }
}

/// Totals clamp at the `Decimal` range instead of overflowing
fn saturating_add(total: Decimal, amount: Decimal) -> Decimal {
    total.checked_add(amount).unwrap_or_else(|| {
        tracing::warn!("Category total out of range, clamping");
        if amount.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        }
    })
}

/// Group transactions by category.
///
/// The uncategorized row always comes first and is always present. It also
/// absorbs transactions pointing at ids the store does not know. Category
/// rows follow in store order and are omitted when empty.
pub fn summarize(transactions: &[Transaction], categories: &[Category]) -> Vec<SummaryRow> {
    let mut rows = vec![SummaryRow::empty(CategoryRef::Uncategorized, UNCATEGORIZED_LABEL)];
    let mut index: HashMap<&CategoryId, usize> = HashMap::new();

    for category in categories {
        if index.contains_key(&category.id) {
            continue;
        }
        index.insert(&category.id, rows.len());
        rows.push(SummaryRow::empty(
            CategoryRef::Category(category.id.clone()),
            &category.name,
        ));
    }

    for tx in transactions {
        let slot = tx
            .category
            .category_id()
            .and_then(|id| index.get(id).copied())
            .unwrap_or(0);
        let row = &mut rows[slot];
        row.count += 1;
        row.total_debit = saturating_add(row.total_debit, tx.debit_amount);
        row.total_credit = saturating_add(row.total_credit, tx.credit_amount);
    }

    rows.into_iter()
        .enumerate()
        .filter(|(slot, row)| *slot == 0 || row.count > 0)
        .map(|(_, mut row)| {
            row.net = saturating_add(row.total_credit, -row.total_debit);
            row
        })
        .collect()
}
