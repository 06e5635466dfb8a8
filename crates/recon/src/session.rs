//! A single operator's stock-take session: ledger, currency, mapping and
//! sign-off state, plus the snapshot handed to the persistence layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ReconError;
use crate::headers::{detect_headers, suggest_mapping};
use crate::ingest::{ingest, SkippedRow};
use crate::ledger::Ledger;
use crate::model::{
    CurrencyContext, FieldMapping, ScanOutcome, StockItem, UnexpectedScanRecord,
};

pub const NO_SCAN_YET: &str = "N/A";

/// Why a scan never reached the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanRejected {
    EmptyToken,
    NoStockLoaded,
}

impl std::fmt::Display for ScanRejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyToken => write!(f, "Input is empty."),
            Self::NoStockLoaded => write!(f, "Load a stock list first."),
        }
    }
}

/// Outcome of a successful load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub items: usize,
    pub total_quantity: i64,
    pub columns: usize,
    pub currency: CurrencyContext,
    pub price_mapped: bool,
    /// Mapping fields filled by header auto-detection.
    pub auto_detected: usize,
    pub skipped: Vec<SkippedRow>,
}

impl LoadSummary {
    pub fn message(&self) -> String {
        let currency_note = match (self.price_mapped, self.currency.is_empty()) {
            (true, false) => format!(" (Detected currency: {}).", self.currency),
            (true, true) => {
                " (Price column loaded, but no currency symbol detected. Displaying raw number).".to_string()
            }
            (false, _) => String::new(),
        };
        format!(
            "Successfully loaded {} unique items ({} total quantity) with {} columns.{} Ready to scan!",
            self.items, self.total_quantity, self.columns, currency_note
        )
    }
}

/// Everything needed to resume a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSnapshot {
    pub expected_stock: Vec<StockItem>,
    pub unexpected_scans: Vec<(String, UnexpectedScanRecord)>,
    pub detected_headers: Vec<String>,
    pub detected_currency_symbol: CurrencyContext,
    pub unique_id_header_name: String,
    pub quantity_header_name: String,
    pub price_header_name: String,
    pub last_scanned_id: String,
    pub colleague_name: String,
    pub is_demo_data: bool,
}

#[derive(Debug, Clone)]
pub struct ReconciliationSession {
    ledger: Ledger,
    currency: CurrencyContext,
    mapping: FieldMapping,
    headers: Vec<String>,
    last_scanned: String,
    operator: Option<String>,
    is_demo: bool,
    auto_detect: bool,
}

impl Default for ReconciliationSession {
    fn default() -> Self {
        Self {
            ledger: Ledger::new(),
            currency: CurrencyContext::none(),
            mapping: FieldMapping::default(),
            headers: Vec::new(),
            last_scanned: NO_SCAN_YET.to_string(),
            operator: None,
            is_demo: false,
            auto_detect: true,
        }
    }
}

impl ReconciliationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session preloaded with the demo list.
    pub fn demo() -> Self {
        let mut session = Self::new();
        session.load_demo();
        session
    }

    pub fn set_auto_detect(&mut self, enabled: bool) {
        self.auto_detect = enabled;
    }

    /// Parse `raw_text` and replace the current stock list.
    ///
    /// On any error, or when no valid rows survive, the session is left as it was.
    pub fn load_text(&mut self, raw_text: &str, mapping: FieldMapping) -> Result<LoadSummary, ReconError> {
        if raw_text.trim().is_empty() {
            return Err(ReconError::empty_input("no stock data supplied"));
        }

        // Suggestions only apply to a load that names no columns at all.
        let mut mapping = mapping;
        let mut auto_detected = 0;
        if self.auto_detect && mapping.is_empty() {
            let headers = detect_headers(raw_text);
            auto_detected = mapping.fill_unset(&suggest_mapping(&headers));
        }
        if !mapping.has_unique_id() {
            return Err(ReconError::MissingMapping);
        }

        let result = ingest(raw_text, &mapping)?;
        if result.is_empty() {
            return Err(ReconError::empty_input(
                "no valid stock items found; check the data and the unique ID header",
            ));
        }

        let columns = result.final_headers.len();
        self.ledger.load(result.items)?;
        self.headers = result.final_headers;
        self.currency = result.currency;
        self.mapping = mapping;
        self.last_scanned = NO_SCAN_YET.to_string();
        self.is_demo = false;

        if !result.skipped.is_empty() {
            warn!(skipped = result.skipped.len(), "rows dropped during load");
        }
        info!(items = self.ledger.len(), currency = %self.currency, "stock list loaded");

        Ok(LoadSummary {
            items: self.ledger.len(),
            total_quantity: self.ledger.total_expected_quantity(),
            columns,
            currency: self.currency.clone(),
            price_mapped: self.mapping.price().is_some(),
            auto_detected,
            skipped: result.skipped,
        })
    }

    /// Apply one scanner token. Empty tokens never reach the ledger.
    pub fn scan(&mut self, token: &str) -> Result<ScanOutcome, ScanRejected> {
        let token = token.trim();
        if self.ledger.is_empty() {
            return Err(ScanRejected::NoStockLoaded);
        }
        if token.is_empty() {
            return Err(ScanRejected::EmptyToken);
        }
        let outcome = self.ledger.apply_scan(token);
        self.last_scanned = token.to_string();
        Ok(outcome)
    }

    pub fn reset_scans(&mut self) {
        self.ledger.reset_scans();
        self.last_scanned = NO_SCAN_YET.to_string();
    }

    /// Replace the session contents with the five-line demo list.
    pub fn load_demo(&mut self) {
        let rows: [(&str, &str, &str, i64, &str, Decimal); 5] = [
            ("Hardware", "Desktop PC - Model 7", "PC-D7-4822", 5, "£1200.00", Decimal::new(120000, 2)),
            ("Software", "Enterprise License Pack", "SOFT-ENT-L9", 15, "€150.00", Decimal::new(15000, 2)),
            ("Consumable", "A4 Paper Pack - White", "CON-PAP-A4", 50, "2.50", Decimal::new(250, 2)),
            ("Tool", "Digital Multimeter", "TOOL-DMM-01", 2, "99.99", Decimal::new(9999, 2)),
            ("Furniture", "Ergonomic Desk Chair", "FURN-CHR-ERGO", 3, "£0.00", Decimal::ZERO),
        ];
        let items = rows
            .iter()
            .map(|(category, description, asset_id, qty, price_text, price)| {
                let mut item = StockItem::new(asset_id, *qty, *price);
                item.attributes = [
                    ("Category", category.to_string()),
                    ("Description", description.to_string()),
                    ("Asset ID", asset_id.to_string()),
                    ("Expected Quantity", qty.to_string()),
                    ("Unit Price", price_text.to_string()),
                ]
                .into_iter()
                .collect();
                item
            })
            .collect();

        self.ledger.replace(items);
        self.headers = ["Category", "Description", "Asset ID", "Expected Quantity", "Unit Price"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        self.currency = CurrencyContext::new("£");
        self.mapping = FieldMapping::new("Asset ID", Some("Expected Quantity"), Some("Unit Price"));
        self.last_scanned = NO_SCAN_YET.to_string();
        self.is_demo = true;
    }

    pub fn set_operator(&mut self, name: &str) {
        let name = name.trim();
        self.operator = (!name.is_empty()).then(|| name.to_string());
    }

    /// Items whose raw id or any attribute contains `text`, case-insensitively.
    pub fn filter_items(&self, text: &str) -> Vec<&StockItem> {
        let needle = text.trim().to_uppercase();
        self.ledger
            .items()
            .iter()
            .filter(|item| item.matches_filter(&needle))
            .collect()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn currency(&self) -> &CurrencyContext {
        &self.currency
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn last_scanned(&self) -> &str {
        &self.last_scanned
    }

    pub fn operator(&self) -> Option<&str> {
        self.operator.as_deref()
    }

    pub fn is_demo(&self) -> bool {
        self.is_demo
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            expected_stock: self.ledger.items().to_vec(),
            unexpected_scans: self.ledger.unexpected_entries().to_vec(),
            detected_headers: self.headers.clone(),
            detected_currency_symbol: self.currency.clone(),
            unique_id_header_name: self.mapping.unique_id_header.clone(),
            quantity_header_name: self.mapping.quantity().unwrap_or("").to_string(),
            price_header_name: self.mapping.price().unwrap_or("").to_string(),
            last_scanned_id: self.last_scanned.clone(),
            colleague_name: self.operator.clone().unwrap_or_default(),
            is_demo_data: self.is_demo,
        }
    }

    pub fn restore(snapshot: SessionSnapshot) -> Result<Self, ReconError> {
        let ledger = Ledger::from_parts(snapshot.expected_stock, snapshot.unexpected_scans)?;
        let mut session = Self {
            ledger,
            currency: snapshot.detected_currency_symbol,
            mapping: FieldMapping::new(
                &snapshot.unique_id_header_name,
                Some(snapshot.quantity_header_name.as_str()),
                Some(snapshot.price_header_name.as_str()),
            ),
            headers: snapshot.detected_headers,
            last_scanned: snapshot.last_scanned_id,
            operator: None,
            is_demo: snapshot.is_demo_data,
            auto_detect: true,
        };
        if session.last_scanned.trim().is_empty() {
            session.last_scanned = NO_SCAN_YET.to_string();
        }
        session.set_operator(&snapshot.colleague_name);
        info!(items = session.ledger.len(), "session restored");
        Ok(session)
    }
}
