pub mod assignment;
pub mod categories;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod normalizer;
pub mod persistence;
pub mod session;
pub mod shell;
pub mod sort;
pub mod summary;

use std::io::Write;
use std::path::Path;

pub use error::{FinancerError, Result};
pub use models::{Category, CategoryId, CategoryRef, Transaction, TransactionId};
pub use session::Session;
pub use summary::SummaryRow;

/// Read a statement file into memory.
///
/// Bytes that are not UTF-8 are reported as a syntax error on the line where
/// they occur, the same as any other malformed input.
pub async fn read_statement(path: impl AsRef<Path>) -> Result<String> {
    let bytes = tokio::fs::read(path.as_ref()).await?;
    String::from_utf8(bytes).map_err(|e| {
        let valid = e.utf8_error().valid_up_to();
        let line = e.as_bytes()[..valid].iter().filter(|b| **b == b'\n').count() as u64 + 1;
        FinancerError::Syntax {
            line: Some(line),
            message: format!("invalid UTF-8 on line {}", line),
        }
    })
}

/// Write transactions to CSV in the order given
pub fn write_transactions<'a, I, W>(transactions: I, writer: W) -> Result<()>
where
    I: IntoIterator<Item = &'a Transaction>,
    W: Write,
{
    let mut csv_writer = csv::Writer::from_writer(writer);

    for tx in transactions {
        csv_writer.serialize(tx)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write summary rows to CSV, amounts at two decimal places
pub fn write_summary<W: Write>(rows: &[SummaryRow], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for row in rows {
        csv_writer.serialize(row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write the category list as `id,name` CSV
pub fn write_categories<W: Write>(categories: &[Category], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for category in categories {
        csv_writer.serialize(category)?;
    }

    csv_writer.flush()?;
    Ok(())
}
