pub mod database;
pub mod results;
pub mod search;
pub mod tools;

use anyhow::Result;
use blastui_core::{config_path, load_config_or_default, Config};
use blastui_results::{import_results, ExportFormat, ResultSet};
use std::path::Path;

/// Configuration from `$BLASTUI_HOME/config.toml`, defaults when absent
pub fn load_config() -> Result<Config> {
    let path = config_path();
    tracing::debug!("Loading configuration from {}", path.display());
    Ok(load_config_or_default(&path)?)
}

/// Load results saved by `search --output` or exported as CSV/TSV/XLSX
pub fn read_results(path: &Path) -> Result<ResultSet> {
    let format = ExportFormat::from_path(path)
        .filter(|f| f.is_importable())
        .unwrap_or(ExportFormat::Json);
    Ok(import_results(path, format)?)
}
