use financer::categories::CategoryStore;
use financer::persistence::MemoryStore;
use financer::session::Session;
use financer::shell::run_shell;

const CSV: &str = "Posted Transactions Date,Description1,Debit Amount,Credit Amount\n\
    2024-01-03,TESCO,10.00,\n\
    2024-01-01,SALARY,,2000.00\n\
    2024-01-02,TESCO EXPRESS,5.00,\n";

fn session() -> Session<MemoryStore> {
    let store = CategoryStore::load(MemoryStore::new(), "k", &["Food", "Income"]);
    let mut session = Session::new(store);
    session.load_csv(CSV).unwrap();
    session
}

fn run(session: &mut Session<MemoryStore>, script: &str) -> String {
    let mut out = Vec::new();
    run_shell(session, script.as_bytes(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_list_shows_sorted_view() {
    let mut session = session();
    let out = run(&mut session, "list\n");
    let rows: Vec<_> = out.lines().skip(2).collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[0].contains("SALARY"));
    assert!(rows[2].contains("TESCO") && !rows[2].contains("EXPRESS"));
}

#[test]
fn test_assign_by_row_and_name() {
    let mut session = session();
    run(&mut session, "assign 1 income\n");
    let salary = session
        .transactions()
        .iter()
        .find(|t| t.description == "SALARY")
        .unwrap();
    assert_eq!(salary.category.category_id(), Some(&session.categories()[1].id));
}

#[test]
fn test_search_select_all_then_bulk() {
    let mut session = session();
    let out = run(&mut session, "search tesco\nselect all\nbulk Food\n");
    assert!(out.contains("updated 2 transactions"));
    assert!(session.selection().is_empty());

    let food = &session.categories()[0].id;
    let tagged = session
        .transactions()
        .iter()
        .filter(|t| t.category.category_id() == Some(food))
        .count();
    assert_eq!(tagged, 2);
}

#[test]
fn test_filter_uncategorized_and_clear() {
    let mut session = session();
    run(&mut session, "assign 1 Income\nfilter category uncategorized\n");
    assert_eq!(session.visible().len(), 2);
    run(&mut session, "filter clear\n");
    assert_eq!(session.visible().len(), 3);
}

#[test]
fn test_sort_toggles_direction() {
    let mut session = session();
    let out = run(&mut session, "sort debit\nsort Debit\n");
    assert!(out.contains("sorted by Debit ascending"));
    assert!(out.contains("sorted by Debit descending"));
    assert_eq!(session.visible()[0].description, "TESCO");
}

#[test]
fn test_bad_input_is_reported_and_loop_continues() {
    let mut session = session();
    let out = run(&mut session, "frobnicate\nassign 9 Food\nselect x\nadd-category Pets\n");
    assert!(out.contains("unknown command 'frobnicate'"));
    assert!(out.contains("no row 9"));
    assert!(out.contains("'x' is not a row number"));
    assert!(out.contains("added Pets"));
}

#[test]
fn test_quit_stops_reading() {
    let mut session = session();
    run(&mut session, "quit\nadd-category Never\n");
    assert!(session.categories().iter().all(|c| c.name != "Never"));
}

#[test]
fn test_summary_lists_uncategorized_first() {
    let mut session = session();
    let out = run(&mut session, "assign 1 Income\nsummary\n");
    let lines: Vec<_> = out.lines().skip(1).collect();
    assert!(lines[0].starts_with("Uncategorized"));
    assert!(lines[1].starts_with("Income"));
}

#[test]
fn test_uncategorized_keyword_clears_assignments() {
    let mut session = session();
    let out = run(
        &mut session,
        "assign 1 Income\nassign 2 Food\nassign 1 uncategorized\nselect 2\nbulk UNCATEGORIZED\n",
    );
    assert!(!out.contains("no category named"));
    assert!(out.contains("updated 1 transactions"));
    assert!(session.transactions().iter().all(|t| t.category.is_uncategorized()));
}

#[test]
fn test_uncategorized_filter_wire_value_in_assign() {
    let mut session = session();
    run(&mut session, "assign 1 Income\nassign 1 __uncategorized__\n");
    assert!(session.transactions().iter().all(|t| t.category.is_uncategorized()));
}
