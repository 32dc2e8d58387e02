//! BLAST+ tool management for BlastUI
//!
//! Locating and installing the BLAST+ executables, running searches under a
//! timeout and cancel token, and building the local databases they search.

pub mod blast;
pub mod database;
pub mod locator;
pub mod manager;
pub mod runner;
pub mod types;

// Re-exports for convenience
pub use blast::{output_format, run_search, BlastCommand, SearchParams, OUTPUT_COLUMNS};
pub use database::{DatabaseRegistry, RegisterOptions, SequenceDatabase};
pub use locator::ToolLocator;
pub use manager::{ToolInfo, ToolManager};
pub use runner::{CancelToken, ProcessOutput, ProcessProgress, ProcessRunner};
pub use types::Tool;
