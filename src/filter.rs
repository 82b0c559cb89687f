use crate::models::{CategoryId, CategoryRef, Transaction};

/// Wire value selecting transactions without a category
pub const UNCATEGORIZED_FILTER: &str = "__uncategorized__";

/// Category part of the filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Uncategorized,
    Category(CategoryId),
}

impl CategoryFilter {
    /// `""` is all, `"__uncategorized__"` is uncategorized, anything else an id
    pub fn from_wire(value: &str) -> Self {
        match value {
            "" => CategoryFilter::All,
            UNCATEGORIZED_FILTER => CategoryFilter::Uncategorized,
            id => CategoryFilter::Category(CategoryId::new(id)),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            CategoryFilter::All => "",
            CategoryFilter::Uncategorized => UNCATEGORIZED_FILTER,
            CategoryFilter::Category(id) => id.as_str(),
        }
    }

    pub fn matches(&self, category: &CategoryRef) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Uncategorized => category.is_uncategorized(),
            CategoryFilter::Category(id) => category.category_id() == Some(id),
        }
    }
}

/// Conjunction of category, date range and description search.
/// Every criterion left unset passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub category: CategoryFilter,
    /// Inclusive lower bound, compared as a string
    pub date_from: Option<String>,
    /// Inclusive upper bound, compared as a string
    pub date_to: Option<String>,
    pub search_text: String,
}

impl FilterCriteria {
    pub fn matches(&self, tx: &Transaction) -> bool {
        if !self.category.matches(&tx.category) {
            return false;
        }

        if let Some(from) = non_empty(&self.date_from) {
            if tx.date.as_str() < from {
                return false;
            }
        }
        if let Some(to) = non_empty(&self.date_to) {
            if tx.date.as_str() > to {
                return false;
            }
        }

        let term = self.search_text.trim();
        if !term.is_empty() && !tx.description.to_lowercase().contains(&term.to_lowercase()) {
            return false;
        }

        true
    }

    /// True when no criterion restricts anything
    pub fn is_unrestricted(&self) -> bool {
        self.category == CategoryFilter::All
            && non_empty(&self.date_from).is_none()
            && non_empty(&self.date_to).is_none()
            && self.search_text.trim().is_empty()
    }
}

fn non_empty(bound: &Option<String>) -> Option<&str> {
    bound.as_deref().filter(|b| !b.is_empty())
}

/// Keep the transactions matching `criteria`, in their original order
pub fn apply<'a, I>(transactions: I, criteria: &FilterCriteria) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|tx| criteria.matches(tx))
        .collect()
}
