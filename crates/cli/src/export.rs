//! `stocktake export full|unexpected|json`.

use std::path::PathBuf;

use chrono::Local;
use stocktake_recon::export::{full_list_table, unexpected_table, write_csv, write_json, ExportKind};

use crate::store::Store;
use crate::util::{is_dash, write_output};
use crate::{CliError, ExportTarget};

impl From<ExportTarget> for ExportKind {
    fn from(target: ExportTarget) -> Self {
        match target {
            ExportTarget::Full => ExportKind::FullCsv,
            ExportTarget::Unexpected => ExportKind::UnexpectedCsv,
            ExportTarget::Json => ExportKind::FullJson,
        }
    }
}

pub fn cmd_export(store: &Store, target: ExportTarget, output: Option<PathBuf>) -> Result<(), CliError> {
    let session = store.session()?;
    let kind = ExportKind::from(target);

    let mut bytes = Vec::new();
    match kind {
        ExportKind::FullCsv => write_csv(&full_list_table(&session), &mut bytes)?,
        ExportKind::UnexpectedCsv => {
            if session.ledger().unexpected_entries().is_empty() {
                eprintln!("note: no unexpected items scanned; writing header only");
            }
            write_csv(&unexpected_table(&session), &mut bytes)?
        }
        ExportKind::FullJson => {
            write_json(&session, &mut bytes)?;
            bytes.push(b'\n');
        }
    }

    let path = output.unwrap_or_else(|| PathBuf::from(kind.default_file_name(Local::now().date_naive())));
    write_output(&path, &bytes)?;
    if !is_dash(&path) {
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}
