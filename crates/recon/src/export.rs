//! Flat tabular and JSON exports of session state.

use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::ReconError;
use crate::model::{StockItem, UnexpectedScanRecord};
use crate::session::ReconciliationSession;

pub const FULL_LIST_EXTRA_COLUMNS: [&str; 3] =
    ["Expected Quantity", "Scanned Quantity", "Remaining Quantity"];
pub const UNEXPECTED_COLUMNS: [&str; 2] = ["Unique ID (Raw)", "Count (Unexpected)"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    FullCsv,
    UnexpectedCsv,
    FullJson,
}

impl ExportKind {
    pub fn default_file_name(self, date: NaiveDate) -> String {
        let day = date.format("%Y-%m-%d");
        match self {
            Self::FullCsv => format!("Stock_Check_Full_Report_{day}.csv"),
            Self::UnexpectedCsv => format!("Stock_Check_Unexpected_Items_{day}.csv"),
            Self::FullJson => format!("Stock_Check_Full_Report_{day}.json"),
        }
    }
}

/// Header row plus data rows, all text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Every expected item: source columns, then expected / scanned / remaining.
/// Remaining is clamped at zero.
pub fn full_list_table(session: &ReconciliationSession) -> Table {
    let source_headers = session.headers();
    let mut headers = source_headers.to_vec();
    headers.extend(FULL_LIST_EXTRA_COLUMNS.iter().map(|c| c.to_string()));

    let rows = session
        .ledger()
        .items()
        .iter()
        .map(|item| {
            let mut row: Vec<String> = source_headers
                .iter()
                .map(|h| item.attributes.get(h).unwrap_or("").to_string())
                .collect();
            row.push(item.expected_quantity.to_string());
            row.push(item.scanned_count.to_string());
            row.push(item.remaining().max(0).to_string());
            row
        })
        .collect();

    Table { headers, rows }
}

pub fn unexpected_table(session: &ReconciliationSession) -> Table {
    Table {
        headers: UNEXPECTED_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows: session
            .ledger()
            .unexpected()
            .map(|r| vec![r.raw_id.clone(), r.count.to_string()])
            .collect(),
    }
}

/// CSV with every cell quoted.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<(), ReconError> {
    let mut csv = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(&table.headers)
        .map_err(|e| ReconError::Export(format!("CSV write error: {e}")))?;
    for row in &table.rows {
        csv.write_record(row)
            .map_err(|e| ReconError::Export(format!("CSV write error: {e}")))?;
    }
    csv.flush()
        .map_err(|e| ReconError::Export(format!("CSV flush error: {e}")))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonExport<'a> {
    expected_stock: &'a [StockItem],
    unexpected_scans: &'a [(String, UnexpectedScanRecord)],
}

/// `{ expectedStock, unexpectedScans }`, pretty-printed.
pub fn write_json<W: Write>(session: &ReconciliationSession, writer: W) -> Result<(), ReconError> {
    let export = JsonExport {
        expected_stock: session.ledger().items(),
        unexpected_scans: session.ledger().unexpected_entries(),
    };
    serde_json::to_writer_pretty(writer, &export)
        .map_err(|e| ReconError::Export(format!("JSON write error: {e}")))
}
