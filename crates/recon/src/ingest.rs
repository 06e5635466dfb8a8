use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ReconError;
use crate::headers::{detect_delimiter, non_blank_lines, split_headers};
use crate::model::{normalize_id, Attributes, CurrencyContext, FieldMapping, StockItem};
use crate::value::{detect_currency_symbol, parse_price, parse_quantity};

/// Output of one ingestion pass.
#[derive(Debug, Clone, Default)]
pub struct IngestResult {
    pub items: Vec<StockItem>,
    /// Detected headers plus any mapped quantity/price header missing from them.
    pub final_headers: Vec<String>,
    /// Frozen from the first row with a positive price.
    pub currency: CurrencyContext,
    pub skipped: Vec<SkippedRow>,
}

impl IngestResult {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A dropped data row. `line` is 1-based among data lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub line: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    InsufficientColumns { found: usize, expected: usize },
    BlankId,
    DuplicateId { raw_id: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientColumns { found, expected } => {
                write!(f, "insufficient columns ({found} of {expected})")
            }
            Self::BlankId => write!(f, "empty unique ID"),
            Self::DuplicateId { raw_id } => {
                write!(f, "duplicate ID {raw_id}, only the first instance is used")
            }
        }
    }
}

/// Case-insensitive exact header lookup.
fn column_index(headers: &[String], name: &str) -> Option<usize> {
    let wanted = name.trim().to_lowercase();
    headers.iter().position(|h| h.trim().to_lowercase() == wanted)
}

/// Parse delimited stock text into deduplicated items.
///
/// Fewer than two non-blank lines is an empty result, not an error. The
/// only hard failure is a unique-id header that cannot be located; bad rows
/// are dropped and logged.
pub fn ingest(raw_text: &str, mapping: &FieldMapping) -> Result<IngestResult, ReconError> {
    let lines = non_blank_lines(raw_text);
    if lines.len() < 2 {
        debug!(lines = lines.len(), "nothing to ingest");
        return Ok(IngestResult::default());
    }

    let delimiter = detect_delimiter(lines[0]);
    let headers = split_headers(lines[0], delimiter);

    let id_idx = column_index(&headers, &mapping.unique_id_header)
        .ok_or_else(|| ReconError::missing_column(mapping.unique_id_header.trim()))?;
    let qty_idx = mapping.quantity().and_then(|h| column_index(&headers, h));
    let price_idx = mapping.price().and_then(|h| column_index(&headers, h));

    let mut items = Vec::new();
    let mut skipped = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut currency: Option<CurrencyContext> = None;

    for (offset, line) in lines[1..].iter().enumerate() {
        let line_no = offset + 1;
        let parts: Vec<&str> = line.split(delimiter).collect();

        if parts.len() < headers.len() {
            warn!(line = line_no, found = parts.len(), expected = headers.len(), row = %line,
                "skipping row: insufficient columns");
            skipped.push(SkippedRow {
                line: line_no,
                reason: SkipReason::InsufficientColumns {
                    found: parts.len(),
                    expected: headers.len(),
                },
            });
            continue;
        }

        // Indices come from the header list with blank headers dropped, but
        // cells are not; a blank header column shifts later columns left.
        let raw_id = parts[id_idx].trim();
        if raw_id.is_empty() {
            warn!(line = line_no, row = %line, "skipping row: empty unique ID");
            skipped.push(SkippedRow { line: line_no, reason: SkipReason::BlankId });
            continue;
        }

        let id = normalize_id(raw_id);
        if !seen.insert(id) {
            warn!(line = line_no, raw_id, "skipping row: duplicate ID, first instance wins");
            skipped.push(SkippedRow {
                line: line_no,
                reason: SkipReason::DuplicateId { raw_id: raw_id.to_string() },
            });
            continue;
        }

        let expected_quantity = qty_idx
            .map(|i| parts[i])
            .filter(|cell| !cell.is_empty())
            .map(parse_quantity)
            .unwrap_or(1);

        let mut unit_price = Decimal::ZERO;
        if let Some(raw_price) = price_idx.map(|i| parts[i].trim()).filter(|c| !c.is_empty()) {
            unit_price = parse_price(raw_price).max(Decimal::ZERO);
            if currency.is_none() && unit_price > Decimal::ZERO {
                currency = Some(CurrencyContext::new(detect_currency_symbol(raw_price)));
            }
        }

        let mut item = StockItem::new(raw_id, expected_quantity, unit_price);
        item.attributes = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.as_str(), parts.get(i).map(|c| c.trim()).unwrap_or("")))
            .collect::<Attributes>();
        items.push(item);
    }

    let mut final_headers = headers.clone();
    for extra in [mapping.quantity(), mapping.price()].into_iter().flatten() {
        let known = final_headers.iter().any(|h| h.to_lowercase() == extra.to_lowercase());
        if !known {
            final_headers.push(extra.to_string());
        }
    }

    debug!(items = items.len(), skipped = skipped.len(), "ingest complete");

    Ok(IngestResult {
        items,
        final_headers,
        currency: currency.unwrap_or_default(),
        skipped,
    })
}
