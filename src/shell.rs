//! Line-oriented session over a loaded statement.
//!
//! Row numbers in commands refer to the list as last printed: the current
//! filtered and sorted view, counted from 1.

use std::io::{BufRead, Write};

use crate::error::Result;
use crate::filter::{CategoryFilter, UNCATEGORIZED_FILTER};
use crate::models::{CategoryRef, Transaction, TransactionId};
use crate::persistence::KeyValueStore;
use crate::session::Session;
use crate::sort::{SortColumn, SortDirection};
use crate::summary::UNCATEGORIZED_LABEL;

const HELP: &str = "\
Commands:
  list                       show the current view
  filter category [NAME|ID]  restrict to a category ('uncategorized', or nothing for all)
  filter from [DATE]         inclusive lower date bound (nothing clears)
  filter to [DATE]           inclusive upper date bound (nothing clears)
  filter clear               drop every filter
  search [TEXT]              description contains TEXT (nothing clears)
  sort COLUMN                sort by COLUMN, again to flip direction
  select N [N ...]           toggle rows
  select all | none          select the whole view or clear the selection
  assign N CATEGORY          set the category of row N ('none' or 'uncategorized' clears it)
  bulk CATEGORY              set the category of every selected row
  add-category NAME          create a category
  categories                 list categories
  summary                    totals per category
  quit";

enum Flow {
    Continue,
    Quit,
}

/// Read commands from `input` until it ends or `quit` is entered
pub fn run_shell<S, R, W>(session: &mut Session<S>, input: R, mut output: W) -> Result<()>
where
    S: KeyValueStore,
    R: BufRead,
    W: Write,
{
    writeln!(
        output,
        "{} transactions loaded. Type 'help' for commands.",
        session.transactions().len()
    )?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match execute(session, line, &mut output) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(CommandError::Usage(message)) => writeln!(output, "error: {message}")?,
            Err(CommandError::Failed(e)) => return Err(e),
        }
    }

    output.flush()?;
    Ok(())
}

enum CommandError {
    /// Bad input; reported and the loop continues
    Usage(String),
    Failed(crate::error::FinancerError),
}

impl From<std::io::Error> for CommandError {
    fn from(e: std::io::Error) -> Self {
        CommandError::Failed(e.into())
    }
}

fn usage<T>(message: impl Into<String>) -> std::result::Result<T, CommandError> {
    Err(CommandError::Usage(message.into()))
}

fn execute<S: KeyValueStore, W: Write>(
    session: &mut Session<S>,
    line: &str,
    out: &mut W,
) -> std::result::Result<Flow, CommandError> {
    let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "help" | "?" => writeln!(out, "{HELP}")?,
        "quit" | "exit" => return Ok(Flow::Quit),
        "list" | "ls" => print_view(session, out)?,
        "filter" => set_filter(session, rest)?,
        "search" => session.filter_mut().search_text = rest.to_string(),
        "sort" => {
            let column: SortColumn = rest.parse().map_err(CommandError::Usage)?;
            session.toggle_sort(column);
            let direction = match session.sort_state().direction {
                SortDirection::Ascending => "ascending",
                SortDirection::Descending => "descending",
            };
            writeln!(out, "sorted by {} {}", column.label(), direction)?;
        }
        "select" => select(session, rest)?,
        "assign" => {
            let (row, category) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| CommandError::Usage("usage: assign N CATEGORY".to_string()))?;
            let id = row_id(session, row)?;
            let category = resolve_category(session, category.trim())?;
            session.assign(&id, category);
        }
        "bulk" => {
            if session.selection().is_empty() {
                return usage("nothing selected");
            }
            let category = resolve_category(session, rest)?;
            let updated = session.bulk_assign(category);
            writeln!(out, "updated {updated} transactions")?;
        }
        "add-category" => match session.add_category(rest) {
            Some(category) => writeln!(out, "added {} ({})", category.name, category.id)?,
            None => return usage("category name must not be blank"),
        },
        "categories" => {
            for category in session.categories() {
                writeln!(out, "{}  {}", category.id, category.name)?;
            }
        }
        "summary" => {
            for row in session.summary() {
                writeln!(
                    out,
                    "{:<20} {:>5} {:>12} {:>12} {:>12}",
                    row.name,
                    row.count,
                    row.total_debit.round_dp(2),
                    row.total_credit.round_dp(2),
                    row.net.round_dp(2)
                )?;
            }
        }
        other => return usage(format!("unknown command '{other}', try 'help'")),
    }

    Ok(Flow::Continue)
}

fn set_filter<S: KeyValueStore>(session: &mut Session<S>, args: &str) -> std::result::Result<(), CommandError> {
    let (field, value) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
    let value = value.trim();
    let bound = |v: &str| (!v.is_empty()).then(|| v.to_string());

    match field {
        "category" => {
            let filter = match value {
                "" => CategoryFilter::All,
                v if is_uncategorized_keyword(v) => CategoryFilter::Uncategorized,
                v => match find_category(session, v) {
                    Some(CategoryRef::Category(id)) => CategoryFilter::Category(id),
                    _ => return usage(format!("no category named '{v}'")),
                },
            };
            session.filter_mut().category = filter;
        }
        "from" => session.filter_mut().date_from = bound(value),
        "to" => session.filter_mut().date_to = bound(value),
        "clear" => session.set_filter(Default::default()),
        _ => return usage("usage: filter category|from|to|clear [VALUE]"),
    }
    Ok(())
}

fn select<S: KeyValueStore>(session: &mut Session<S>, args: &str) -> std::result::Result<(), CommandError> {
    match args {
        "all" => session.select_all(true),
        "none" => session.select_all(false),
        "" => return usage("usage: select N [N ...] | all | none"),
        rows => {
            let current: &Session<S> = session;
            let ids = rows
                .split_whitespace()
                .map(|row| row_id(current, row))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            for id in &ids {
                session.toggle_selection(id);
            }
        }
    }
    Ok(())
}

fn row_id<S: KeyValueStore>(session: &Session<S>, row: &str) -> std::result::Result<TransactionId, CommandError> {
    let number: usize = row
        .trim()
        .parse()
        .map_err(|_| CommandError::Usage(format!("'{row}' is not a row number")))?;
    let visible = session.visible();
    number
        .checked_sub(1)
        .and_then(|index| visible.get(index))
        .map(|tx| tx.id.clone())
        .ok_or_else(|| CommandError::Usage(format!("no row {number} in the current view")))
}

fn is_uncategorized_keyword(value: &str) -> bool {
    value.eq_ignore_ascii_case("uncategorized") || value == UNCATEGORIZED_FILTER
}

/// Match by id first, then by name ignoring case
fn find_category<S: KeyValueStore>(session: &Session<S>, query: &str) -> Option<CategoryRef> {
    let categories = session.categories();
    categories
        .iter()
        .find(|c| c.id.as_str() == query)
        .or_else(|| categories.iter().find(|c| c.name.eq_ignore_ascii_case(query)))
        .map(|c| CategoryRef::Category(c.id.clone()))
}

fn resolve_category<S: KeyValueStore>(
    session: &Session<S>,
    query: &str,
) -> std::result::Result<CategoryRef, CommandError> {
    if query.is_empty() || query.eq_ignore_ascii_case("none") || is_uncategorized_keyword(query) {
        return Ok(CategoryRef::Uncategorized);
    }
    find_category(session, query).map_or_else(|| usage(format!("no category named '{query}'")), Ok)
}

fn category_label<S: KeyValueStore>(session: &Session<S>, tx: &Transaction) -> String {
    match &tx.category {
        CategoryRef::Uncategorized => UNCATEGORIZED_LABEL.to_string(),
        CategoryRef::Category(id) => session
            .category_store()
            .name_of(id)
            .map_or_else(|| format!("? {id}"), str::to_string),
    }
}

fn print_view<S: KeyValueStore, W: Write>(session: &Session<S>, out: &mut W) -> std::io::Result<()> {
    let visible = session.visible();
    let marker = if session.all_visible_selected() { "[x]" } else { "[ ]" };
    writeln!(
        out,
        "{} {} of {} shown, {} selected",
        marker,
        visible.len(),
        session.transactions().len(),
        session.selection().len()
    )?;

    for (index, tx) in visible.iter().enumerate() {
        let selected = if session.is_selected(&tx.id) { "[x]" } else { "[ ]" };
        writeln!(
            out,
            "{} {:>4}  {:<10}  {:<32}  {:>10}  {:>10}  {}",
            selected,
            index + 1,
            tx.date,
            tx.description,
            tx.debit_amount,
            tx.credit_amount,
            category_label(session, tx)
        )?;
    }
    Ok(())
}
