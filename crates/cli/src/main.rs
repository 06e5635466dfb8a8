// stocktake CLI - load an expected stock list, scan against it, report
// Session state persists between invocations (see store.rs)

mod exit_codes;
mod export;
mod load;
mod scan;
mod store;
mod util;
mod view;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use stocktake_recon::ReconError;

use exit_codes::{recon_exit_code, EXIT_ERROR, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};
use store::Store;

#[derive(Parser)]
#[command(name = "stocktake")]
#[command(about = "Reconcile an expected stock list against scanned items")]
#[command(version)]
struct Cli {
    /// Session state file (default: ~/.config/stocktake/state.json)
    #[arg(long, global = true, env = "STOCKTAKE_STATE", value_name = "PATH")]
    state: Option<PathBuf>,

    /// Log engine activity (row drops, loads) to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the detected headers and the suggested column mapping
    #[command(after_help = "\
Examples:
  stocktake headers stock.csv
  stocktake headers stock.tsv --json
  pbpaste | stocktake headers -")]
    Headers {
        /// Stock list file (`-` for stdin)
        input: PathBuf,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Load an expected stock list, replacing the current session
    #[command(after_help = "\
Examples:
  stocktake load stock.csv
  stocktake load stock.csv --id 'Asset ID' --qty 'Expected Quantity' --price 'Unit Price'
  cat stock.tsv | stocktake load -")]
    Load {
        /// Stock list file, comma or tab separated (`-` for stdin)
        input: PathBuf,

        /// Unique ID header (auto-detected when omitted)
        #[arg(long, value_name = "HEADER")]
        id: Option<String>,

        /// Expected quantity header
        #[arg(long, value_name = "HEADER")]
        qty: Option<String>,

        /// Unit price header
        #[arg(long, value_name = "HEADER")]
        price: Option<String>,
    },

    /// Record scans; with no tokens, read one per line from stdin
    #[command(after_help = "\
Examples:
  stocktake scan PC-D7-4822
  stocktake scan TOOL-DMM-01 TOOL-DMM-01
  stocktake scan < scanner.log")]
    Scan {
        /// Scanned IDs
        tokens: Vec<String>,
    },

    /// List items with their scan status
    Status {
        /// Only items whose ID or any column contains TEXT
        #[arg(long, value_name = "TEXT")]
        filter: Option<String>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Complete-check report: missing, over-scanned, unexpected, financials
    Report {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Export the session as CSV or JSON
    #[command(after_help = "\
Examples:
  stocktake export full
  stocktake export unexpected -o strays.csv
  stocktake export json -o - | jq '.unexpectedScans'")]
    Export {
        /// What to export
        kind: ExportTarget,

        /// Output file (`-` for stdout; default: dated file in the current directory)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Zero every scan count and forget unexpected scans
    Reset,

    /// Replace the session with the built-in demo list
    Demo,

    /// Delete the saved session
    Clear,

    /// Record who signs off the report
    #[command(after_help = "\
Examples:
  stocktake sign-off 'Jo Bloggs'
  stocktake sign-off 'Night Shift' --remember")]
    SignOff {
        /// Operator name
        name: String,

        /// Also store the name as the default operator in settings.json
        #[arg(long)]
        remember: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ExportTarget {
    /// Every expected item with expected / scanned / remaining
    Full,
    /// Scans that matched no expected item
    Unexpected,
    /// Full session as JSON
    Json,
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store = Store::open(cli.state);

    let result = match cli.command {
        Commands::Headers { input, json } => load::cmd_headers(input, json),
        Commands::Load { input, id, qty, price } => load::cmd_load(&store, input, id, qty, price),
        Commands::Scan { tokens } => scan::cmd_scan(&store, tokens),
        Commands::Status { filter, json } => view::cmd_status(&store, filter, json),
        Commands::Report { json } => view::cmd_report(&store, json),
        Commands::Export { kind, output } => export::cmd_export(&store, kind, output),
        Commands::Reset => cmd_reset(&store),
        Commands::Demo => cmd_demo(&store),
        Commands::Clear => cmd_clear(&store),
        Commands::SignOff { name, remember } => cmd_sign_off(&store, name, remember),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(EXIT_IO, msg)
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        Self::new(recon_exit_code(&err), err.to_string())
    }
}

// ============================================================================
// reset / demo / clear / sign-off
// ============================================================================

fn cmd_reset(store: &Store) -> Result<(), CliError> {
    let mut session = store.session()?;
    session.reset_scans();
    store.save(&session)?;
    println!(
        "All scan counts reset. {} items back to PENDING.",
        session.ledger().len()
    );
    Ok(())
}

fn cmd_demo(store: &Store) -> Result<(), CliError> {
    let mut session = store.session()?;
    session.load_demo();
    store.save(&session)?;
    println!(
        "Loaded demo stock list: {} items ({} total quantity).",
        session.ledger().len(),
        session.ledger().total_expected_quantity()
    );
    Ok(())
}

fn cmd_clear(store: &Store) -> Result<(), CliError> {
    if store.clear()? {
        println!("Removed saved session {}", store.state_path());
    } else {
        println!("No saved session at {}", store.state_path());
    }
    Ok(())
}

fn cmd_sign_off(store: &Store, name: String, remember: bool) -> Result<(), CliError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::args("operator name is empty"));
    }
    let mut session = store.session()?;
    session.set_operator(name);
    store.save(&session)?;

    if remember {
        let mut settings = store.settings.clone();
        settings.operator = Some(name.to_string());
        settings
            .save()
            .map_err(|e| CliError::io(format!("cannot save settings: {e}")))?;
    }
    println!("Report will be signed off by {name}");
    Ok(())
}
