// Transaction loader / normalizer
// Raw tabular export → typed records. All-or-nothing per load: any bad row
// aborts the whole file so the caller never sees a partial record set.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};
use crate::store::UNCATEGORIZED;

/// Expected Date column format, e.g. "04 Jan 2024". No lenient fallback.
pub const DATE_FORMAT: &str = "%d %b %Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Debit,
    Credit,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Debit => "Debit",
            Direction::Credit => "Credit",
        }
    }
}

/// One normalized transaction row. Session-scoped: rebuilt wholesale on each
/// upload, never persisted individually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,

    /// Free-text description; the classification key.
    pub details: String,

    /// Currency magnitude as parsed (thousands separators stripped).
    pub amount: f64,

    pub direction: Direction,

    /// Assigned category, `"Uncategorized"` until classification.
    pub category: String,
}

/// Raw row as it appears in the export. Headers are trimmed on read and extra
/// columns are ignored; a missing required column fails the load.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Date")]
    date: String,

    #[serde(rename = "Details")]
    details: String,

    #[serde(rename = "Amount")]
    amount: String,

    #[serde(rename = "Debit/Credit")]
    direction: String,
}

/// Load and normalize a transaction export from any reader.
///
/// `Err` means "nothing loaded": the current load is aborted and prior
/// session state is untouched. Never returns a partial set.
pub fn load_transactions<R: Read>(input: R) -> Result<Vec<Transaction>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(input);

    let mut records = Vec::new();
    let headers = reader.headers()?.clone();

    for result in reader.records() {
        let record = result?;
        // Physical line in the file (the header is line 1), so every parse
        // failure reports the same numbering regardless of which layer fails
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        let row: RawRow = record.deserialize(Some(&headers))?;

        records.push(Transaction {
            date: parse_date(&row.date, line)?,
            details: row.details.trim().to_string(),
            amount: parse_amount(&row.amount, line)?,
            direction: parse_direction(&row.direction, line)?,
            category: UNCATEGORIZED.to_string(),
        });
    }

    Ok(records)
}

/// Load from a file path.
pub fn load_transactions_file(path: &Path) -> Result<Vec<Transaction>> {
    let file = std::fs::File::open(path)
        .map_err(|e| Error::parse(0, format!("could not open {}: {}", path.display(), e)))?;
    load_transactions(file)
}

fn parse_date(raw: &str, line: usize) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| Error::parse(line, format!("date {:?} is not in DD Mon YYYY format", raw)))
}

fn parse_amount(raw: &str, line: usize) -> Result<f64> {
    // Exports write amounts either plain (1234.56) or comma-grouped
    // ("1,234.56"); both normalize to the same float.
    let cleaned = raw.trim().replace(',', "");
    cleaned
        .parse::<f64>()
        .map_err(|_| Error::parse(line, format!("amount {:?} is not numeric", raw)))
}

fn parse_direction(raw: &str, line: usize) -> Result<Direction> {
    match raw.trim() {
        "Debit" => Ok(Direction::Debit),
        "Credit" => Ok(Direction::Credit),
        other => Err(Error::parse(
            line,
            format!("Debit/Credit value {:?} is neither Debit nor Credit", other),
        )),
    }
}

// ============================================================================
// TESTS
// ============================================================================
