// Configuration loading

pub mod settings;
pub mod state;

pub use settings::{MappingDefaults, Settings};
pub use state::StateFile;

use std::path::PathBuf;

/// `~/.config/stocktake`, or `./stocktake` when the platform has no config dir.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stocktake")
}
