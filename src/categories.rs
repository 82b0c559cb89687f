use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::models::{Category, CategoryId};
use crate::persistence::KeyValueStore;

/// Storage key the category list is kept under
pub const CATEGORIES_KEY: &str = "financer-categories";

/// Seed list used when nothing has been stored yet
pub const DEFAULT_CATEGORIES: [&str; 11] = [
    "Groceries",
    "Dining",
    "Transport",
    "Utilities",
    "Rent",
    "Shopping",
    "Entertainment",
    "Health",
    "Income",
    "Transfers",
    "Other",
];

/// Stored entries are `{id, name}` objects; older stores hold bare names.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredCategory {
    Entry(Category),
    Legacy(String),
}

/// Ordered list of user categories with stable ids
///
/// Storage failures never escape: they are logged and the in-memory list
/// stays authoritative for the rest of the session.
pub struct CategoryStore<S: KeyValueStore> {
    categories: Vec<Category>,
    backend: S,
    key: String,
}

impl<S: KeyValueStore> CategoryStore<S> {
    /// Load the list under `key`, seeding from `defaults` when nothing is
    /// stored. Seeded or upgraded lists are written back so their ids stay
    /// stable across sessions.
    ///
    /// A stored value that cannot be read is never overwritten here: the
    /// defaults are used in memory only. Single malformed entries are skipped.
    pub fn load<T: AsRef<str>>(backend: S, key: impl Into<String>, defaults: &[T]) -> Self {
        let mut store = Self {
            categories: Vec::new(),
            backend,
            key: key.into(),
        };

        let needs_save = match store.backend.load(&store.key) {
            Ok(None) => {
                store.seed(defaults);
                true
            }
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Value>>(&raw) {
                Ok(entries) => store.restore(entries),
                Err(e) => {
                    tracing::warn!("Stored categories are unreadable, using defaults without saving: {e}");
                    store.seed(defaults);
                    false
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read categories from storage: {e}");
                store.seed(defaults);
                false
            }
        };

        if needs_save {
            store.save();
        }
        store
    }

    /// Load with the default key and seed list
    pub fn with_defaults(backend: S) -> Self {
        Self::load(backend, CATEGORIES_KEY, &DEFAULT_CATEGORIES)
    }

    fn seed<T: AsRef<str>>(&mut self, defaults: &[T]) {
        for name in defaults {
            self.push_named(name.as_ref());
        }
    }

    /// Returns true if a legacy entry was upgraded and the list needs writing back
    fn restore(&mut self, entries: Vec<Value>) -> bool {
        let mut changed = false;
        for value in entries {
            let entry = match serde_json::from_value::<StoredCategory>(value.clone()) {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping malformed stored category {value}: {e}");
                    continue;
                }
            };
            match entry {
                StoredCategory::Legacy(name) => {
                    self.push_named(&name);
                    changed = true;
                }
                StoredCategory::Entry(category) => {
                    if category.id.as_str().is_empty() || self.get(&category.id).is_some() {
                        tracing::warn!(
                            "Dropping stored category {:?} with empty or duplicate id {:?}",
                            category.name,
                            category.id.as_str()
                        );
                        continue;
                    }
                    self.categories.push(category);
                }
            }
        }
        changed
    }

    fn push_named(&mut self, name: &str) {
        let base = format!("cat-{}-{}", slug(name), now_millis());
        let id = self.unique_id(base);
        self.categories.push(Category {
            id,
            name: name.to_string(),
        });
    }

    fn unique_id(&self, base: String) -> CategoryId {
        let mut candidate = CategoryId::new(base.clone());
        while self.get(&candidate).is_some() {
            candidate = CategoryId::new(format!("{}-{}", base, random_suffix()));
        }
        candidate
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    pub fn name_of(&self, id: &CategoryId) -> Option<&str> {
        self.get(id).map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Append a category. Blank names are ignored; duplicate names are not.
    pub fn add(&mut self, name: &str) -> Option<&Category> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let id = self.unique_id(format!("cat-{}-{}", now_millis(), random_suffix()));
        tracing::info!("Adding category {:?} as {}", name, id);
        self.categories.push(Category {
            id,
            name: name.to_string(),
        });
        self.save();
        self.categories.last()
    }

    /// Ids of all known categories
    pub fn ids(&self) -> HashSet<&CategoryId> {
        self.categories.iter().map(|c| &c.id).collect()
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    fn save(&mut self) {
        let value = match serde_json::to_string(&self.categories) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to serialize categories: {e}");
                return;
            }
        };
        if let Err(e) = self.backend.save(&self.key, &value) {
            tracing::warn!("Failed to persist categories, keeping in-memory list: {e}");
        }
    }
}

fn slug(name: &str) -> String {
    name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn random_suffix() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..7].to_string()
}
