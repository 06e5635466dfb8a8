//! Read-side discrepancy and financial reporting over ledger state.
//!
//! Nothing here mutates the ledger. Unexpected scans carry no value: there
//! is no price for an identifier outside the expected set.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::Ledger;
use crate::model::{CurrencyContext, StockItem, UnexpectedScanRecord};
use crate::session::ReconciliationSession;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Missing (remaining > 0), over-scanned (remaining < 0) and unexpected.
/// Completed items are not discrepancies and appear in neither item list.
#[derive(Debug, Clone, Serialize)]
pub struct Classification<'a> {
    pub missing: Vec<&'a StockItem>,
    pub over_scanned: Vec<&'a StockItem>,
    pub unexpected: Vec<&'a UnexpectedScanRecord>,
}

impl Classification<'_> {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.over_scanned.is_empty() && self.unexpected.is_empty()
    }
}

pub fn classify(ledger: &Ledger) -> Classification<'_> {
    let mut missing = Vec::new();
    let mut over_scanned = Vec::new();
    for item in ledger.items() {
        match item.remaining() {
            r if r > 0 => missing.push(item),
            r if r < 0 => over_scanned.push(item),
            _ => {}
        }
    }
    Classification {
        missing,
        over_scanned,
        unexpected: ledger.unexpected().collect(),
    }
}

// ---------------------------------------------------------------------------
// Financial summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FinancialSummary {
    pub expected_value: Decimal,
    pub scanned_value: Decimal,
    /// Sum of per-item shortfalls, as a positive amount.
    pub missing_value: Decimal,
    pub over_value: Decimal,
    /// `scanned_value - expected_value`; negative is a net loss.
    pub net_discrepancy: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetVerdict {
    Loss,
    Gain,
    Balanced,
}

impl std::fmt::Display for NetVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loss => write!(f, "LOSS"),
            Self::Gain => write!(f, "GAIN"),
            Self::Balanced => write!(f, "BALANCED"),
        }
    }
}

impl FinancialSummary {
    pub fn verdict(&self) -> NetVerdict {
        if self.net_discrepancy < Decimal::ZERO {
            NetVerdict::Loss
        } else if self.net_discrepancy > Decimal::ZERO {
            NetVerdict::Gain
        } else {
            NetVerdict::Balanced
        }
    }

    /// e.g. `Net Inventory Discrepancy: LOSS of £16.00`
    pub fn net_line(&self, currency: &CurrencyContext) -> String {
        format!(
            "Net Inventory Discrepancy: {} of {}",
            self.verdict(),
            currency.format(self.net_discrepancy.abs())
        )
    }

    /// Labelled, currency-formatted figures in display order.
    pub fn lines(&self, currency: &CurrencyContext) -> Vec<(&'static str, String)> {
        vec![
            ("Expected Inventory Value", currency.format(self.expected_value)),
            ("Scanned Inventory Value", currency.format(self.scanned_value)),
            ("Missing Value (Understocked)", currency.format(self.missing_value)),
            ("Over Value (Overstocked)", currency.format(self.over_value)),
        ]
    }
}

pub fn financial_summary(ledger: &Ledger) -> FinancialSummary {
    let mut summary = FinancialSummary::default();
    for item in ledger.items() {
        let expected = item.expected_value();
        let scanned = item.scanned_value();
        summary.expected_value = summary.expected_value.saturating_add(expected);
        summary.scanned_value = summary.scanned_value.saturating_add(scanned);

        let discrepancy = scanned.saturating_sub(expected);
        if discrepancy < Decimal::ZERO {
            summary.missing_value = summary.missing_value.saturating_add(discrepancy.abs());
        } else if discrepancy > Decimal::ZERO {
            summary.over_value = summary.over_value.saturating_add(discrepancy);
        }
    }
    summary.net_discrepancy = summary.scanned_value.saturating_sub(summary.expected_value);
    summary
}

// ---------------------------------------------------------------------------
// Report rows
// ---------------------------------------------------------------------------

/// One missing or over-scanned item, flattened for display and export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscrepancyRow {
    pub id: String,
    pub raw_id: String,
    /// Attribute values in `headers` order; absent columns are empty.
    pub cells: Vec<String>,
    pub expected_quantity: i64,
    pub scanned_count: i64,
    /// `expected - scanned`; positive is a shortfall.
    pub discrepancy: i64,
    pub unit_price: Decimal,
    /// `discrepancy * unit_price`.
    pub value: Decimal,
}

impl DiscrepancyRow {
    pub fn from_item(item: &StockItem, headers: &[String]) -> Self {
        let discrepancy = item.remaining();
        Self {
            id: item.id.clone(),
            raw_id: item.raw_id.clone(),
            cells: headers
                .iter()
                .map(|h| item.attributes.get(h).unwrap_or("").to_string())
                .collect(),
            expected_quantity: item.expected_quantity,
            scanned_count: item.scanned_count,
            discrepancy,
            unit_price: item.unit_price,
            value: Decimal::from(discrepancy).saturating_mul(item.unit_price),
        }
    }
}

/// `INVENTORY_REPORT_<YYYYMMDD>_<HHMMSS>_<NAME>`.
///
/// NAME is the operator upper-cased with everything except letters, digits,
/// space, `-` and `_` removed, then spaces and hyphens turned into `_`.
pub fn report_id(operator: Option<&str>, at: NaiveDateTime) -> String {
    let raw = operator
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("UNSPECIFIED_USER");
    let name: String = raw
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-' || *c == '_')
        .map(|c| if c.is_whitespace() || c == '-' { '_' } else { c })
        .collect();
    format!("INVENTORY_REPORT_{}_{}", at.format("%Y%m%d_%H%M%S"), name)
}

// ---------------------------------------------------------------------------
// Complete-check report
// ---------------------------------------------------------------------------

/// Owned, serializable snapshot of the complete-check view.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub report_id: String,
    pub signed_off_by: Option<String>,
    pub currency: CurrencyContext,
    pub headers: Vec<String>,
    pub missing: Vec<DiscrepancyRow>,
    pub over_scanned: Vec<DiscrepancyRow>,
    pub unexpected: Vec<UnexpectedScanRecord>,
    /// `None` when no price column is mapped.
    pub financial: Option<FinancialSummary>,
    /// Column whose values priced the financial summary.
    pub price_header: Option<String>,
}

impl Report {
    pub fn build(session: &ReconciliationSession, at: NaiveDateTime) -> Self {
        let ledger = session.ledger();
        let headers = session.headers().to_vec();
        let classification = classify(ledger);
        let rows = |items: &[&StockItem]| -> Vec<DiscrepancyRow> {
            items.iter().map(|i| DiscrepancyRow::from_item(i, &headers)).collect()
        };

        let price_header = session.mapping().price().map(str::to_string);
        Self {
            report_id: report_id(session.operator(), at),
            signed_off_by: session.operator().map(str::to_string),
            currency: session.currency().clone(),
            missing: rows(&classification.missing),
            over_scanned: rows(&classification.over_scanned),
            unexpected: classification.unexpected.into_iter().cloned().collect(),
            financial: price_header.as_ref().map(|_| financial_summary(ledger)),
            price_header,
            headers,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.over_scanned.is_empty() && self.unexpected.is_empty()
    }
}
