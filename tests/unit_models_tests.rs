use financer::models::{CategoryId, CategoryRef, Transaction};

#[test]
fn test_empty_wire_value_is_uncategorized() {
    assert_eq!(CategoryRef::from_wire(""), CategoryRef::Uncategorized);
    assert_eq!(CategoryRef::from(String::new()), CategoryRef::Uncategorized);
    assert_eq!(CategoryRef::from(CategoryId::new("")), CategoryRef::Uncategorized);
    assert_eq!(CategoryRef::from(None), CategoryRef::Uncategorized);
}

#[test]
fn test_wire_value_round_trips_through_serde() {
    let mut tx = Transaction::new("tx-0-1");
    tx.category = CategoryRef::from_wire("cat-food");

    let json = serde_json::to_value(&tx).unwrap();
    assert_eq!(json["categoryId"], "cat-food");
    assert_eq!(json["debitAmount"], "0");

    tx.category = CategoryRef::Uncategorized;
    let json = serde_json::to_value(&tx).unwrap();
    assert_eq!(json["categoryId"], "");
}

#[test]
fn test_category_id_accessor() {
    let cat = CategoryRef::from_wire("cat-a");
    assert_eq!(cat.category_id().map(CategoryId::as_str), Some("cat-a"));
    assert!(!cat.is_uncategorized());
    assert!(CategoryRef::Uncategorized.category_id().is_none());
}
