//! Session persistence between invocations.
//!
//! Every command opens the store, works on the restored session and, if it
//! mutated anything, saves it back. A missing state file starts from the demo
//! list so a fresh install has something to scan against.

use std::path::PathBuf;

use stocktake_config::{Settings, StateFile};
use stocktake_recon::{ReconciliationSession, SessionSnapshot};
use tracing::{debug, info};

use crate::exit_codes::{recon_exit_code, EXIT_IO, EXIT_STATE_CORRUPT};
use crate::CliError;

pub(crate) struct Store {
    pub settings: Settings,
    state: StateFile,
}

impl Store {
    pub fn open(explicit: Option<PathBuf>) -> Self {
        let settings = Settings::load();
        let state = StateFile::resolve(explicit, &settings);
        debug!(path = %state.path().display(), "state file");
        Self { settings, state }
    }

    pub fn state_path(&self) -> String {
        self.state.path().display().to_string()
    }

    /// Restore the saved session, or the demo list when none is saved.
    pub fn session(&self) -> Result<ReconciliationSession, CliError> {
        let snapshot: Option<SessionSnapshot> = self.state.load().map_err(|e| {
            CliError::new(EXIT_STATE_CORRUPT, format!("cannot read state: {e}"))
                .with_hint("run `stocktake clear` to start over")
        })?;

        let mut session = match snapshot {
            Some(snapshot) => ReconciliationSession::restore(snapshot).map_err(|e| {
                CliError::new(recon_exit_code(&e), e.to_string())
                    .with_hint("run `stocktake clear` to start over")
            })?,
            None => {
                info!("no saved session, starting from the demo list");
                ReconciliationSession::demo()
            }
        };
        session.set_auto_detect(self.settings.auto_detect_headers);
        Ok(session)
    }

    pub fn save(&self, session: &ReconciliationSession) -> Result<(), CliError> {
        self.state
            .save(&session.snapshot())
            .map_err(|e| CliError::new(EXIT_IO, format!("cannot save state: {e}")))
    }

    /// Returns whether anything was removed.
    pub fn clear(&self) -> Result<bool, CliError> {
        self.state
            .remove()
            .map_err(|e| CliError::new(EXIT_IO, format!("cannot remove state: {e}")))
    }
}
