//! `stocktake-recon`: stock-take reconciliation engine.
//!
//! Pure engine crate: ingests delimited stock lists, applies scan events to a
//! ledger, and derives discrepancy and financial reports on demand.
//! No CLI or filesystem dependencies.

pub mod error;
pub mod export;
pub mod headers;
pub mod ingest;
pub mod ledger;
pub mod model;
pub mod report;
pub mod session;
pub mod value;

pub use error::ReconError;
pub use ingest::{ingest, IngestResult};
pub use ledger::Ledger;
pub use model::{
    CurrencyContext, FieldMapping, ItemStatus, ScanOutcome, StockItem, UnexpectedScanRecord,
};
pub use report::{classify, financial_summary, Report};
pub use session::{LoadSummary, ReconciliationSession, ScanRejected, SessionSnapshot};
