#![allow(dead_code)]

use std::path::PathBuf;

use financer::categories::CategoryStore;
use financer::models::{CategoryId, CategoryRef, Transaction};
use financer::persistence::MemoryStore;
use financer::session::Session;
use rust_decimal::Decimal;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

/// Read a fixture from tests/fixtures
pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).unwrap()
}

/// Session over an in-memory store seeded with `categories`
pub fn memory_session(categories: &[&str]) -> Session<MemoryStore> {
    Session::new(CategoryStore::load(MemoryStore::new(), "financer-categories", categories))
}

/// Session with `name` from tests/fixtures already loaded
pub fn loaded_session(name: &str, categories: &[&str]) -> Session<MemoryStore> {
    let mut session = memory_session(categories);
    session.load_csv(&fixture(name)).unwrap();
    session
}

/// Id of the first category called `name`
pub fn category_id(session: &Session<MemoryStore>, name: &str) -> CategoryId {
    session
        .categories()
        .iter()
        .find(|c| c.name == name)
        .map(|c| c.id.clone())
        .unwrap_or_else(|| panic!("no category named {name}"))
}

/// Transaction with only id, category and amounts set
pub fn make_transaction(id: &str, category: &str, debit: Decimal, credit: Decimal) -> Transaction {
    let mut tx = Transaction::new(id);
    tx.category = CategoryRef::from_wire(category);
    tx.debit_amount = debit;
    tx.credit_amount = credit;
    tx
}

pub fn descriptions(list: &[&Transaction]) -> Vec<String> {
    list.iter().map(|t| t.description.clone()).collect()
}
