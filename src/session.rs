use std::collections::HashSet;

use crate::assignment;
use crate::categories::CategoryStore;
use crate::error::Result;
use crate::filter::{self, FilterCriteria};
use crate::models::{Category, CategoryRef, Transaction, TransactionId};
use crate::normalizer::TransactionNormalizer;
use crate::persistence::KeyValueStore;
use crate::sort::{self, SortColumn, SortState};
use crate::summary::{self, SummaryRow};

/// State of one categorization session
///
/// Owns the loaded transactions, the selection set, the category store and
/// the current filter and sort. Transactions live only here; loading a new
/// file replaces them wholesale and clears the selection in the same step.
///
/// # Example
///
/// ```
/// use financer::categories::CategoryStore;
/// use financer::models::CategoryRef;
/// use financer::persistence::MemoryStore;
/// use financer::session::Session;
///
/// let store = CategoryStore::load(MemoryStore::new(), "financer-categories", &["Food"]);
/// let food = store.categories()[0].id.clone();
/// let mut session = Session::new(store);
///
/// session
///     .load_csv("Posted Transactions Date,Description1,Debit Amount\n2024-01-02,TESCO,12.50\n")
///     .unwrap();
///
/// let id = session.transactions()[0].id.clone();
/// session.assign(&id, CategoryRef::from(food));
///
/// let summary = session.summary();
/// assert_eq!(summary[1].name, "Food");
/// assert_eq!(summary[1].count, 1);
/// ```
pub struct Session<S: KeyValueStore> {
    transactions: Vec<Transaction>,
    selection: HashSet<TransactionId>,
    categories: CategoryStore<S>,
    normalizer: TransactionNormalizer,
    filter: FilterCriteria,
    sort: SortState,
    last_error: Option<String>,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(categories: CategoryStore<S>) -> Self {
        Self::with_normalizer(categories, TransactionNormalizer::new())
    }

    pub fn with_normalizer(categories: CategoryStore<S>, normalizer: TransactionNormalizer) -> Self {
        Self {
            transactions: Vec::new(),
            selection: HashSet::new(),
            categories,
            normalizer,
            filter: FilterCriteria::default(),
            sort: SortState::default(),
            last_error: None,
        }
    }

    /// Replace the transaction list with the contents of `text`.
    ///
    /// The selection is cleared either way. On a syntax error the list is
    /// left empty and the message is kept in [`Session::last_error`].
    pub fn load_csv(&mut self, text: &str) -> Result<usize> {
        self.selection.clear();
        self.last_error = None;

        match self.normalizer.normalize(text) {
            Ok(transactions) => {
                self.transactions = transactions;
                Ok(self.transactions.len())
            }
            Err(e) => {
                tracing::warn!("Import failed: {e}");
                self.transactions = Vec::new();
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn categories(&self) -> &[Category] {
        self.categories.categories()
    }

    pub fn category_store(&self) -> &CategoryStore<S> {
        &self.categories
    }

    pub fn add_category(&mut self, name: &str) -> Option<&Category> {
        self.categories.add(name)
    }

    /// Returns false if no transaction has `id`
    pub fn assign(&mut self, id: &TransactionId, category: CategoryRef) -> bool {
        assignment::assign(&mut self.transactions, id, category)
    }

    /// Assign `category` to every selected transaction, then clear the selection
    pub fn bulk_assign(&mut self, category: CategoryRef) -> usize {
        let updated = assignment::bulk_assign(&mut self.transactions, &self.selection, category);
        self.selection.clear();
        updated
    }

    pub fn selection(&self) -> &HashSet<TransactionId> {
        &self.selection
    }

    pub fn is_selected(&self, id: &TransactionId) -> bool {
        self.selection.contains(id)
    }

    pub fn toggle_selection(&mut self, id: &TransactionId) {
        if !self.selection.remove(id) {
            self.selection.insert(id.clone());
        }
    }

    /// Select exactly the filtered view, or clear everything when `checked` is false
    pub fn select_all(&mut self, checked: bool) {
        let ids: HashSet<TransactionId> = if checked {
            self.filtered().into_iter().map(|tx| tx.id.clone()).collect()
        } else {
            HashSet::new()
        };
        self.selection = ids;
    }

    /// True when the view is non-empty and every visible row is selected
    pub fn all_visible_selected(&self) -> bool {
        let visible = self.filtered();
        !visible.is_empty() && visible.iter().all(|tx| self.selection.contains(&tx.id))
    }

    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    pub fn set_filter(&mut self, criteria: FilterCriteria) {
        self.filter = criteria;
    }

    pub fn filter_mut(&mut self) -> &mut FilterCriteria {
        &mut self.filter
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    pub fn set_sort(&mut self, state: SortState) {
        self.sort = state;
    }

    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.sort.toggle(column);
    }

    /// Transactions passing the current filter, in load order
    pub fn filtered(&self) -> Vec<&Transaction> {
        filter::apply(&self.transactions, &self.filter)
    }

    /// Filtered and sorted rows as they would be displayed
    pub fn visible(&self) -> Vec<&Transaction> {
        sort::apply(self.filtered(), &self.sort, self.categories.categories())
    }

    /// Totals over all loaded transactions, ignoring the filter
    pub fn summary(&self) -> Vec<SummaryRow> {
        summary::summarize(&self.transactions, self.categories.categories())
    }
}
