//! CLI Exit Code Registry
//!
//! Single source of truth for all `stocktake` exit codes. Scripts driving a
//! scanner session rely on them, so treat them as part of the shell contract.
//!
//! | Code | Meaning                                          |
//! |------|--------------------------------------------------|
//! | 0    | Success                                          |
//! | 1    | General error (unspecified)                      |
//! | 2    | Usage error (bad args, blank header name)        |
//! | 3    | I/O error (unreadable input, unwritable output)  |
//! | 4    | Mapped column not present in the header row      |
//! | 5    | Input had no usable stock rows                   |
//! | 6    | No stock list loaded in the session              |
//! | 7    | State file could not be parsed or restored       |

use stocktake_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Input file unreadable, export target unwritable, state file unwritable.
pub const EXIT_IO: u8 = 3;

/// The unique ID header (or another mapped header) is not in the file.
pub const EXIT_MISSING_COLUMN: u8 = 4;

/// Blank input, or every data row was dropped.
pub const EXIT_EMPTY_INPUT: u8 = 5;

/// Scan attempted before any stock list was loaded.
pub const EXIT_NO_SESSION: u8 = 6;

/// State file exists but is not a valid session snapshot.
pub const EXIT_STATE_CORRUPT: u8 = 7;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::MissingColumn { .. } => EXIT_MISSING_COLUMN,
        ReconError::MissingMapping => EXIT_USAGE,
        ReconError::EmptyInput(_) | ReconError::NoItems => EXIT_EMPTY_INPUT,
        ReconError::Snapshot(_) => EXIT_STATE_CORRUPT,
        ReconError::Export(_) => EXIT_IO,
    }
}
