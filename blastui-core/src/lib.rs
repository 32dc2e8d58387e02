//! Core utilities and types shared across all BlastUI crates

pub mod config;
pub mod error;
pub mod system;
pub mod types;

// Re-export commonly used types
pub use config::{load_config, load_config_or_default, save_config, Config};
pub use error::{
    BlastUiError, BlastUiResult, ExportError, InvalidResidue, ParseError, SubprocessError,
    ValidationError,
};
pub use types::{BlastProgram, MoleculeType, ScoringMatrix};

// Re-export system utilities
pub use system::{
    blastui_databases_dir, blastui_home, blastui_tools_dir, blastui_workspace_dir, config_path,
    describe_paths,
};

/// Version information for the BlastUI project
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
