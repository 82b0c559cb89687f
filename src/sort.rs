use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::models::{Category, CategoryId, CategoryRef, Transaction};
use crate::summary::UNCATEGORIZED_LABEL;

/// Columns the transaction table can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Date,
    Description,
    DebitAmount,
    CreditAmount,
    Balance,
    TransactionType,
    LocalCurrencyAmount,
    /// Derived from the category's display name
    Category,
}

impl SortColumn {
    pub const ALL: [SortColumn; 8] = [
        SortColumn::Date,
        SortColumn::Description,
        SortColumn::DebitAmount,
        SortColumn::CreditAmount,
        SortColumn::Balance,
        SortColumn::TransactionType,
        SortColumn::LocalCurrencyAmount,
        SortColumn::Category,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SortColumn::Date => "date",
            SortColumn::Description => "description",
            SortColumn::DebitAmount => "debitAmount",
            SortColumn::CreditAmount => "creditAmount",
            SortColumn::Balance => "balance",
            SortColumn::TransactionType => "transactionType",
            SortColumn::LocalCurrencyAmount => "localCurrencyAmount",
            SortColumn::Category => "category",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortColumn::Date => "Date",
            SortColumn::Description => "Description",
            SortColumn::DebitAmount => "Debit",
            SortColumn::CreditAmount => "Credit",
            SortColumn::Balance => "Balance",
            SortColumn::TransactionType => "Type",
            SortColumn::LocalCurrencyAmount => "Local amount",
            SortColumn::Category => "Category",
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SortColumn {
    type Err = String;

    /// Accepts the column key or its label, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(s) || c.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown sort column: '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Current sort of the table. Defaults to date, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: Option<SortColumn>,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: Some(SortColumn::Date),
            direction: SortDirection::Ascending,
        }
    }
}

impl SortState {
    pub fn unsorted() -> Self {
        Self {
            column: None,
            direction: SortDirection::Ascending,
        }
    }

    /// Same column flips direction, a new column starts ascending
    pub fn toggle(&mut self, column: SortColumn) {
        if self.column == Some(column) {
            self.direction = self.direction.reversed();
        } else {
            self.column = Some(column);
            self.direction = SortDirection::Ascending;
        }
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Number(Decimal),
    Text(String),
}

/// Name a category reference sorts under: the label for uncategorized, the
/// empty string for an id missing from the store
fn category_sort_name(category: &CategoryRef, names: &HashMap<&CategoryId, &str>) -> String {
    match category {
        CategoryRef::Uncategorized => UNCATEGORIZED_LABEL.to_lowercase(),
        CategoryRef::Category(id) => names.get(id).map(|n| n.to_lowercase()).unwrap_or_default(),
    }
}

fn sort_key(tx: &Transaction, column: SortColumn, names: &HashMap<&CategoryId, &str>) -> SortKey {
    match column {
        SortColumn::Date => SortKey::Text(tx.date.to_lowercase()),
        SortColumn::Description => SortKey::Text(tx.description.to_lowercase()),
        SortColumn::TransactionType => SortKey::Text(tx.transaction_type.to_lowercase()),
        SortColumn::DebitAmount => SortKey::Number(tx.debit_amount),
        SortColumn::CreditAmount => SortKey::Number(tx.credit_amount),
        SortColumn::Balance => SortKey::Number(tx.balance),
        SortColumn::LocalCurrencyAmount => SortKey::Number(tx.local_currency_amount),
        SortColumn::Category => SortKey::Text(category_sort_name(&tx.category, names)),
    }
}

/// Return a sorted copy of `transactions`; the input order is untouched.
///
/// Keys are computed once per row. The sort is stable, so ties keep their
/// original relative order in either direction.
pub fn apply<'a, I>(transactions: I, state: &SortState, categories: &[Category]) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let Some(column) = state.column else {
        return transactions.into_iter().collect();
    };

    let mut names: HashMap<&CategoryId, &str> = HashMap::new();
    for category in categories {
        names.entry(&category.id).or_insert(category.name.as_str());
    }

    let mut keyed: Vec<(SortKey, &'a Transaction)> = transactions
        .into_iter()
        .map(|tx| (sort_key(tx, column, &names), tx))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ord: Ordering = a.cmp(b);
        match state.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });

    keyed.into_iter().map(|(_, tx)| tx).collect()
}
