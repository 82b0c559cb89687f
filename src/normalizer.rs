use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{FinancerError, Result};
use crate::models::{CategoryRef, Transaction, TransactionId};

/// Statement columns that survive normalization. Every other header is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    PostedDate,
    Description,
    DebitAmount,
    CreditAmount,
    Balance,
    TransactionType,
    LocalCurrencyAmount,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::PostedDate,
        Column::Description,
        Column::DebitAmount,
        Column::CreditAmount,
        Column::Balance,
        Column::TransactionType,
        Column::LocalCurrencyAmount,
    ];

    /// Exact header text in the bank export
    pub fn header(self) -> &'static str {
        match self {
            Column::PostedDate => "Posted Transactions Date",
            Column::Description => "Description1",
            Column::DebitAmount => "Debit Amount",
            Column::CreditAmount => "Credit Amount",
            Column::Balance => "Balance",
            Column::TransactionType => "Transaction Type",
            Column::LocalCurrencyAmount => "Local Currency Amount",
        }
    }

    /// Match a trimmed header name against the recognized set
    pub fn from_header(header: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.header() == header)
    }
}

/// Turns raw statement text into typed transactions.
///
/// Import is all-or-nothing: any syntax error aborts with no transactions.
/// Individual fields never fail; bad amounts become zero and missing columns
/// become empty.
#[derive(Debug, Clone)]
pub struct TransactionNormalizer {
    delimiter: u8,
}

impl TransactionNormalizer {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn normalize(&self, text: &str) -> Result<Vec<Transaction>> {
        if let Some((line, message)) = quote_error(text, self.delimiter) {
            return Err(FinancerError::Syntax {
                line: Some(line),
                message,
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(text.as_bytes());

        // Collect everything first so a late error leaves nothing behind
        let mut rows = Vec::new();
        for result in reader.records() {
            rows.push(result?);
        }

        let Some((header, data)) = rows.split_first() else {
            return Ok(Vec::new());
        };

        let columns: Vec<Option<Column>> = header
            .iter()
            .map(|h| Column::from_header(h.trim()))
            .collect();

        let stamp = chrono::Utc::now().timestamp_millis();
        let kept: Vec<&csv::StringRecord> = data.iter().filter(|row| !is_blank(row)).collect();

        if kept.len() < data.len() {
            tracing::debug!("Dropped {} blank rows", data.len() - kept.len());
        }

        let transactions: Vec<Transaction> = kept
            .into_iter()
            .enumerate()
            .map(|(index, row)| build_transaction(format!("tx-{}-{}", index, stamp), &columns, row))
            .collect();

        tracing::info!("Normalized {} transactions", transactions.len());
        Ok(transactions)
    }
}

impl Default for TransactionNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_blank(row: &csv::StringRecord) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

fn build_transaction(id: String, columns: &[Option<Column>], row: &csv::StringRecord) -> Transaction {
    // Later duplicates of a header overwrite earlier ones
    let mut values: HashMap<Column, &str> = HashMap::new();
    for (index, column) in columns.iter().enumerate() {
        if let Some(column) = column {
            values.insert(*column, row.get(index).map(str::trim).unwrap_or(""));
        }
    }

    let text = |column: Column| values.get(&column).copied().unwrap_or("").to_string();
    let amount = |column: Column| values.get(&column).map_or(Decimal::ZERO, |v| parse_amount(v));

    Transaction {
        id: TransactionId::new(id),
        category: CategoryRef::Uncategorized,
        date: text(Column::PostedDate),
        description: text(Column::Description),
        debit_amount: amount(Column::DebitAmount),
        credit_amount: amount(Column::CreditAmount),
        balance: amount(Column::Balance),
        transaction_type: text(Column::TransactionType),
        local_currency_amount: amount(Column::LocalCurrencyAmount),
    }
}

/// Parse a locale-formatted amount. Thousands separators are stripped and
/// the leading number is read, so `"12.50 CR"` is 12.50. A cell with no
/// leading number, or one outside the `Decimal` range, is zero.
pub fn parse_amount(value: &str) -> Decimal {
    let cleaned = value.trim().replace(',', "");
    let Some((mantissa, exponent)) = leading_number(&cleaned) else {
        if !cleaned.is_empty() {
            tracing::debug!("Coercing non-numeric amount {:?} to zero", value);
        }
        return Decimal::ZERO;
    };

    let amount = Decimal::from_str(&mantissa)
        .ok()
        .and_then(|m| scale_by_exponent(m, exponent));

    amount.unwrap_or_else(|| {
        tracing::debug!("Coercing out-of-range amount {:?} to zero", value);
        Decimal::ZERO
    })
}

/// Split the longest leading `[+-]digits[.digits][e[+-]digits]` into a
/// mantissa the decimal parser accepts (`.5` becomes `0.5`, `5.` becomes `5`)
/// and a power of ten. `None` when there are no mantissa digits.
fn leading_number(text: &str) -> Option<(String, i32)> {
    let bytes = text.as_bytes();
    let digits_from = |start: usize| {
        let mut end = start;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        end
    };

    let mut i = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    let int_end = digits_from(i);
    let int_part = &text[i..int_end];
    i = int_end;

    let mut frac_part = "";
    if bytes.get(i) == Some(&b'.') {
        let frac_end = digits_from(i + 1);
        frac_part = &text[i + 1..frac_end];
        i = frac_end;
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut mantissa = String::new();
    if negative {
        mantissa.push('-');
    }
    mantissa.push_str(if int_part.is_empty() { "0" } else { int_part });
    if !frac_part.is_empty() {
        mantissa.push('.');
        mantissa.push_str(frac_part);
    }

    // Exponent only counts when digits follow it
    let mut exponent = 0i32;
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        let exp_negative = bytes.get(j) == Some(&b'-');
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            let magnitude = text[j..exp_end].parse::<i32>().unwrap_or(i32::MAX);
            exponent = if exp_negative { -magnitude } else { magnitude };
        }
    }

    Some((mantissa, exponent))
}

/// `mantissa * 10^exponent`, or `None` past the top of the `Decimal` range.
/// Values too small to represent round to zero.
fn scale_by_exponent(mantissa: Decimal, exponent: i32) -> Option<Decimal> {
    const MAX_STEPS: u32 = 64;

    if mantissa.is_zero() || exponent == 0 {
        return Some(mantissa);
    }
    if exponent.unsigned_abs() > MAX_STEPS {
        return (exponent < 0).then_some(Decimal::ZERO);
    }

    let mut value = mantissa;
    for _ in 0..exponent.unsigned_abs() {
        value = if exponent > 0 {
            value.checked_mul(Decimal::TEN)?
        } else {
            value.checked_div(Decimal::TEN)?
        };
    }
    Some(value)
}

/// First quoting problem in `text`, as the line it is on and a message.
///
/// The tokenizer reads an open quote to end of input, and glues text after a
/// closing quote onto the field, without complaint, so both are checked up
/// front. Quotes only open a field at its first byte; `""` inside a quoted
/// field is an escaped quote. A closing quote must be followed, after any
/// blanks, by the delimiter, a line end or end of input.
fn quote_error(text: &str, delimiter: u8) -> Option<(u64, String)> {
    let bytes = text.as_bytes();
    let mut line = 1u64;
    let mut quote_line = 0u64;
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\n' {
            line += 1;
        }

        if in_quotes {
            if b == b'"' {
                if bytes.get(i + 1) == Some(&b'"') {
                    i += 2;
                    continue;
                }
                // Blanks may sit between the closing quote and the delimiter
                let mut next = i + 1;
                while matches!(bytes.get(next), Some(b' ' | b'\t')) && bytes[next] != delimiter {
                    next += 1;
                }
                match bytes.get(next) {
                    None | Some(b'\n') | Some(b'\r') => {}
                    Some(b) if *b == delimiter => {}
                    Some(_) => {
                        return Some((line, format!("unexpected text after closing quote on line {}", line)));
                    }
                }
                in_quotes = false;
            }
        } else if b == delimiter || b == b'\n' {
            at_field_start = true;
            i += 1;
            continue;
        } else if b == b'"' && at_field_start {
            in_quotes = true;
            quote_line = line;
        }

        at_field_start = false;
        i += 1;
    }

    in_quotes.then(|| {
        (
            quote_line,
            format!("quoted field starting on line {} is unterminated", quote_line),
        )
    })
}
