//! `stocktake scan`: tokens from argv, or a scanner device piped to stdin.

use std::io::{self, BufRead, Write};

use stocktake_recon::{ReconciliationSession, ScanRejected};

use crate::exit_codes::EXIT_NO_SESSION;
use crate::store::Store;
use crate::CliError;

pub fn cmd_scan(store: &Store, tokens: Vec<String>) -> Result<(), CliError> {
    let mut session = store.session()?;

    if !tokens.is_empty() {
        for token in &tokens {
            apply(&mut session, token)?;
        }
        return store.save(&session);
    }

    // Scanner mode: one token per line, saved as we go so an interrupted
    // session keeps every scan already acknowledged.
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.map_err(|e| CliError::io(format!("cannot read stdin: {e}")))?;
        if apply(&mut session, &line)? {
            store.save(&session)?;
        }
    }
    Ok(())
}

/// Returns whether the ledger changed.
fn apply(session: &mut ReconciliationSession, token: &str) -> Result<bool, CliError> {
    match session.scan(token) {
        Ok(outcome) => {
            let mut out = io::stdout().lock();
            writeln!(out, "{}", outcome.message())
                .and_then(|_| out.flush())
                .map_err(|e| CliError::io(e.to_string()))?;
            Ok(true)
        }
        Err(ScanRejected::EmptyToken) => {
            eprintln!("{}", ScanRejected::EmptyToken);
            Ok(false)
        }
        Err(rejected @ ScanRejected::NoStockLoaded) => Err(CliError::new(EXIT_NO_SESSION, rejected.to_string())
            .with_hint("run `stocktake load <FILE>` or `stocktake demo`")),
    }
}
