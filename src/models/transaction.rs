use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::CategoryId;

/// Identifier of a transaction, unique within one loaded file
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Category a transaction is assigned to.
///
/// On the wire an uncategorized transaction carries an empty string, every
/// other value is a category id. The id is not checked against the category
/// store, so a reference may dangle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryRef {
    #[default]
    Uncategorized,
    Category(CategoryId),
}

impl CategoryRef {
    /// Empty input normalizes to `Uncategorized`
    pub fn from_wire(value: &str) -> Self {
        if value.is_empty() {
            CategoryRef::Uncategorized
        } else {
            CategoryRef::Category(CategoryId::new(value))
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            CategoryRef::Uncategorized => "",
            CategoryRef::Category(id) => id.as_str(),
        }
    }

    pub fn category_id(&self) -> Option<&CategoryId> {
        match self {
            CategoryRef::Uncategorized => None,
            CategoryRef::Category(id) => Some(id),
        }
    }

    pub fn is_uncategorized(&self) -> bool {
        matches!(self, CategoryRef::Uncategorized)
    }
}

impl From<String> for CategoryRef {
    fn from(value: String) -> Self {
        if value.is_empty() {
            CategoryRef::Uncategorized
        } else {
            CategoryRef::Category(CategoryId::from(value))
        }
    }
}

impl From<CategoryRef> for String {
    fn from(value: CategoryRef) -> Self {
        match value {
            CategoryRef::Uncategorized => String::new(),
            CategoryRef::Category(id) => id.into_string(),
        }
    }
}

impl From<&str> for CategoryRef {
    fn from(value: &str) -> Self {
        CategoryRef::from_wire(value)
    }
}

impl From<CategoryId> for CategoryRef {
    fn from(id: CategoryId) -> Self {
        if id.as_str().is_empty() {
            CategoryRef::Uncategorized
        } else {
            CategoryRef::Category(id)
        }
    }
}

impl From<Option<CategoryId>> for CategoryRef {
    fn from(id: Option<CategoryId>) -> Self {
        id.map_or(CategoryRef::Uncategorized, CategoryRef::from)
    }
}

/// A normalized bank statement line.
///
/// `date` keeps the source representation; ordering on it is plain string
/// ordering, which only matches calendar order for ISO-style dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(rename = "categoryId")]
    pub category: CategoryRef,
    pub date: String,
    pub description: String,
    pub debit_amount: Decimal,
    pub credit_amount: Decimal,
    pub balance: Decimal,
    pub transaction_type: String,
    pub local_currency_amount: Decimal,
}

impl Transaction {
    /// Empty, uncategorized transaction with the given id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: TransactionId::new(id),
            category: CategoryRef::Uncategorized,
            date: String::new(),
            description: String::new(),
            debit_amount: Decimal::ZERO,
            credit_amount: Decimal::ZERO,
            balance: Decimal::ZERO,
            transaction_type: String::new(),
            local_currency_amount: Decimal::ZERO,
        }
    }
}
