use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReconError {
    /// Declared unique-id header is not among the detected headers.
    #[error("unique ID header \"{column}\" not found in the data headers")]
    MissingColumn { column: String },
    /// No unique-id header was supplied or detected.
    #[error("no unique ID header specified")]
    MissingMapping,
    /// Nothing to load: blank text or no valid data rows.
    #[error("empty input: {0}")]
    EmptyInput(String),
    /// Ledger load attempted with an empty item list.
    #[error("cannot load an empty stock list")]
    NoItems,
    /// A persisted snapshot could not be restored.
    #[error("snapshot error: {0}")]
    Snapshot(String),
    /// CSV / JSON export writer failure.
    #[error("export error: {0}")]
    Export(String),
}

impl ReconError {
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn { column: column.into() }
    }

    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }
}
