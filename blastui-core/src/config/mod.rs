//! Configuration types for BlastUI

use crate::BlastUiError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub blast: BlastConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlastConfig {
    /// Directory holding BLAST+ executables; searched before PATH
    #[serde(default)]
    pub executables_dir: Option<String>,
    /// Threads passed to `-num_threads` (0 = all available)
    #[serde(default)]
    pub threads: usize,
    /// Seconds before a running search is killed (0 = never)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_target_seqs")]
    pub max_target_seqs: usize,
    #[serde(default = "default_evalue")]
    pub evalue: f64,
    /// Minimum query coverage per HSP, in percent (0 = no cutoff)
    #[serde(default = "default_qcov_hsp_perc")]
    pub qcov_hsp_perc: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Base directory for indexed databases
    #[serde(default)]
    pub database_dir: Option<String>,
    /// Contigs shorter than this are dropped before indexing (0 = keep all)
    #[serde(default)]
    pub min_contig_length: usize,
    /// Rename contig headers to `<genome>_NODE_<n>` when building a database
    #[serde(default = "default_rename_headers")]
    pub rename_headers: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_fasta_line_width")]
    pub fasta_line_width: usize,
    #[serde(default = "default_format")]
    pub default_format: String,
}

// Default value functions
fn default_timeout_secs() -> u64 { 3600 }
fn default_max_target_seqs() -> usize { 500 }
fn default_evalue() -> f64 { 10.0 }
fn default_qcov_hsp_perc() -> f64 { 10.0 }
fn default_rename_headers() -> bool { true }
fn default_fasta_line_width() -> usize { 60 }
fn default_format() -> String { "xlsx".to_string() }

impl Default for BlastConfig {
    fn default() -> Self {
        Self {
            executables_dir: None,
            threads: 0,
            timeout_secs: default_timeout_secs(),
            max_target_seqs: default_max_target_seqs(),
            evalue: default_evalue(),
            qcov_hsp_perc: default_qcov_hsp_perc(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_dir: None,
            min_contig_length: 0,
            rename_headers: default_rename_headers(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            fasta_line_width: default_fasta_line_width(),
            default_format: default_format(),
        }
    }
}

pub fn default_config() -> Config {
    Config::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, BlastUiError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| BlastUiError::Configuration(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

/// Load the config at `path`, falling back to defaults when the file does not exist
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<Config, BlastUiError> {
    let path = path.as_ref();
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!("No config at {}, using defaults", path.display());
        Ok(Config::default())
    }
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), BlastUiError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| BlastUiError::Configuration(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}
