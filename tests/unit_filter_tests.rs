use financer::filter::{apply, CategoryFilter, FilterCriteria, UNCATEGORIZED_FILTER};
use financer::models::{CategoryRef, Transaction};

fn tx(id: &str, date: &str, description: &str, category: &str) -> Transaction {
    let mut tx = Transaction::new(id);
    tx.date = date.to_string();
    tx.description = description.to_string();
    tx.category = CategoryRef::from_wire(category);
    tx
}

fn sample() -> Vec<Transaction> {
    vec![
        tx("1", "2024-01-05", "Tesco Stores", "food"),
        tx("2", "2024-01-10", "Dublin Bus", ""),
        tx("3", "2024-02-01", "TESCO EXPRESS", "food"),
        tx("4", "2024-02-15", "Rent February", "ghost"),
    ]
}

fn ids(list: &[&Transaction]) -> Vec<String> {
    list.iter().map(|t| t.id.to_string()).collect()
}

#[test]
fn test_empty_criteria_is_identity() {
    let data = sample();
    let criteria = FilterCriteria::default();
    assert!(criteria.is_unrestricted());
    let out = apply(&data, &criteria);
    assert_eq!(out.len(), data.len());
    assert!(out.iter().zip(&data).all(|(a, b)| *a == b));
}

#[test]
fn test_category_filter_exact_match() {
    let data = sample();
    let criteria = FilterCriteria {
        category: CategoryFilter::from_wire("food"),
        ..Default::default()
    };
    assert_eq!(ids(&apply(&data, &criteria)), ["1", "3"]);
}

#[test]
fn test_uncategorized_filter_excludes_dangling_ids() {
    let data = sample();
    let criteria = FilterCriteria {
        category: CategoryFilter::from_wire(UNCATEGORIZED_FILTER),
        ..Default::default()
    };
    assert_eq!(ids(&apply(&data, &criteria)), ["2"]);
}

#[test]
fn test_date_bounds_are_inclusive() {
    let data = sample();
    let criteria = FilterCriteria {
        date_from: Some("2024-01-10".to_string()),
        date_to: Some("2024-02-01".to_string()),
        ..Default::default()
    };
    assert_eq!(ids(&apply(&data, &criteria)), ["2", "3"]);
}

#[test]
fn test_empty_date_bound_is_unset() {
    let data = sample();
    let criteria = FilterCriteria {
        date_from: Some(String::new()),
        date_to: Some(String::new()),
        ..Default::default()
    };
    assert!(criteria.is_unrestricted());
    assert_eq!(apply(&data, &criteria).len(), 4);
}

#[test]
fn test_search_is_trimmed_and_case_insensitive() {
    let data = sample();
    let criteria = FilterCriteria {
        search_text: "  tesco ".to_string(),
        ..Default::default()
    };
    assert_eq!(ids(&apply(&data, &criteria)), ["1", "3"]);
}

#[test]
fn test_whitespace_search_matches_all() {
    let data = sample();
    let criteria = FilterCriteria {
        search_text: "   ".to_string(),
        ..Default::default()
    };
    assert_eq!(apply(&data, &criteria).len(), 4);
}

#[test]
fn test_predicates_combine() {
    let data = sample();
    let criteria = FilterCriteria {
        category: CategoryFilter::from_wire("food"),
        date_from: Some("2024-02-01".to_string()),
        search_text: "tesco".to_string(),
        ..Default::default()
    };
    assert_eq!(ids(&apply(&data, &criteria)), ["3"]);
}

#[test]
fn test_wire_round_trip() {
    for wire in ["", UNCATEGORIZED_FILTER, "cat-1"] {
        assert_eq!(CategoryFilter::from_wire(wire).as_wire(), wire);
    }
}
