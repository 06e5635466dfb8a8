//! `stocktake status` and `stocktake report`.

use chrono::Local;
use serde::Serialize;
use stocktake_recon::model::Attributes;
use stocktake_recon::report::DiscrepancyRow;
use stocktake_recon::{CurrencyContext, ItemStatus, Report, StockItem};

use crate::store::Store;
use crate::util::{pad_right, truncate_display};
use crate::CliError;

const MAX_ID_WIDTH: usize = 24;
const MAX_DETAILS_WIDTH: usize = 48;

// ============================================================================
// status
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusRow<'a> {
    id: &'a str,
    raw_id: &'a str,
    status: ItemStatus,
    expected_quantity: i64,
    scanned_count: i64,
    remaining: i64,
    attributes: &'a Attributes,
}

impl<'a> From<&'a StockItem> for StatusRow<'a> {
    fn from(item: &'a StockItem) -> Self {
        Self {
            id: &item.id,
            raw_id: &item.raw_id,
            status: item.status(),
            expected_quantity: item.expected_quantity,
            scanned_count: item.scanned_count,
            remaining: item.remaining(),
            attributes: &item.attributes,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusOutput<'a> {
    last_scanned: &'a str,
    is_demo: bool,
    unexpected_count: usize,
    items: Vec<StatusRow<'a>>,
}

pub fn cmd_status(store: &Store, filter: Option<String>, json: bool) -> Result<(), CliError> {
    let session = store.session()?;
    let items = session.filter_items(filter.as_deref().unwrap_or(""));

    if json {
        let out = StatusOutput {
            last_scanned: session.last_scanned(),
            is_demo: session.is_demo(),
            unexpected_count: session.ledger().unexpected_entries().len(),
            items: items.iter().map(|i| StatusRow::from(*i)).collect(),
        };
        let json = serde_json::to_string_pretty(&out)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    let ledger = session.ledger();
    let demo = if session.is_demo() { "  [demo data]" } else { "" };
    println!(
        "{} items, {} expected in total{}",
        ledger.len(),
        ledger.total_expected_quantity(),
        demo
    );
    println!("Last scanned: {}", session.last_scanned());
    println!();

    let id_width = items
        .iter()
        .map(|i| unicode_width::UnicodeWidthStr::width(i.raw_id.as_str()))
        .max()
        .unwrap_or(0)
        .clamp("UNIQUE ID".len(), MAX_ID_WIDTH);

    println!(
        "{}  {}  {:>8}  {:>8}  {:>9}  DETAILS",
        pad_right("UNIQUE ID", id_width),
        pad_right("STATUS", 9),
        "EXPECTED",
        "SCANNED",
        "REMAINING"
    );
    let id_header = session.mapping().unique_id_header.as_str();
    for item in &items {
        println!(
            "{}  {}  {:>8}  {:>8}  {:>9}  {}",
            pad_right(&item.raw_id, id_width),
            pad_right(&item.status().to_string(), 9),
            item.expected_quantity,
            item.scanned_count,
            item.remaining(),
            truncate_display(&details(item, id_header), MAX_DETAILS_WIDTH)
        );
    }
    if items.is_empty() {
        println!("(no matching items)");
    }

    let unexpected = ledger.unexpected_entries().len();
    if unexpected > 0 {
        println!();
        println!("{unexpected} unexpected ID(s) scanned; see `stocktake report`");
    }
    Ok(())
}

/// Source columns other than the unique id, in file order.
fn details(item: &StockItem, id_header: &str) -> String {
    item.attributes
        .iter()
        .filter(|(column, value)| !column.eq_ignore_ascii_case(id_header) && !value.is_empty())
        .map(|(_, value)| value)
        .collect::<Vec<_>>()
        .join(" | ")
}

// ============================================================================
// report
// ============================================================================

pub fn cmd_report(store: &Store, json: bool) -> Result<(), CliError> {
    let mut session = store.session()?;
    if session.operator().is_none() {
        if let Some(ref name) = store.settings.operator {
            session.set_operator(name);
        }
    }
    let report = Report::build(&session, Local::now().naive_local());

    if json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json}");
        return Ok(());
    }

    print!("{}", render_report(&report));
    Ok(())
}

fn render_report(report: &Report) -> String {
    let currency = &report.currency;
    let mut out = String::new();
    let mut line = |s: String| {
        out.push_str(&s);
        out.push('\n');
    };

    line(report.report_id.clone());
    line(format!(
        "Signed off by: {}",
        report.signed_off_by.as_deref().unwrap_or("N/A")
    ));
    line(String::new());

    if report.is_clean() {
        line("All expected items accounted for. No discrepancies.".to_string());
        line(String::new());
    }

    line(format!("MISSING ITEMS ({})", report.missing.len()));
    for row in &report.missing {
        line(discrepancy_line(report, row, currency));
    }
    line(String::new());

    line(format!("OVER-SCANNED ITEMS ({})", report.over_scanned.len()));
    for row in &report.over_scanned {
        line(discrepancy_line(report, row, currency));
    }
    line(String::new());

    line(format!("UNEXPECTED ITEMS ({})", report.unexpected.len()));
    for record in &report.unexpected {
        line(format!("  {}  x{}", record.raw_id, record.count));
    }
    line(String::new());

    match (&report.financial, &report.price_header) {
        (Some(summary), Some(price_header)) => {
            line(format!("FINANCIAL SUMMARY (priced by \"{price_header}\")"));
            for (label, value) in summary.lines(currency) {
                line(format!("  {label}: {value}"));
            }
            line(format!("  {}", summary.net_line(currency)));
        }
        _ => line("Financial summary skipped: no price column mapped.".to_string()),
    }
    out
}

/// `  <cells> | expected 5, scanned 3, short 2 x £2.00 = £4.00`
fn discrepancy_line(report: &Report, row: &DiscrepancyRow, currency: &CurrencyContext) -> String {
    let cells: Vec<&str> = row.cells.iter().map(String::as_str).filter(|c| !c.is_empty()).collect();
    let label = if cells.is_empty() { row.raw_id.clone() } else { cells.join(" | ") };
    let mut text = format!(
        "  {label}: expected {}, scanned {}",
        row.expected_quantity, row.scanned_count
    );
    let word = if row.discrepancy >= 0 { "short" } else { "over" };
    let units = row.discrepancy.unsigned_abs();
    text.push_str(&format!(", {word} {units}"));
    if report.financial.is_some() {
        text.push_str(&format!(
            " x {} = {}",
            currency.format(row.unit_price),
            currency.format(row.value.abs())
        ));
    }
    text
}
