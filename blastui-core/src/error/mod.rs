//! Core error types for BlastUI

pub mod subprocess;
pub mod validation;

use std::path::PathBuf;
use thiserror::Error;
pub use subprocess::SubprocessError;
pub use validation::{InvalidResidue, ValidationError};

/// Malformed tabular output from the alignment engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct ParseError {
    /// 1-based line number in the payload
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Failure while writing or re-reading an export file
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{format} encoding failed: {message}")]
    Encode { format: String, message: String },

    #[error("hit {subject} for query {query} has no aligned sequence to export")]
    MissingSequence { query: String, subject: String },

    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("nothing to export: the result set is empty")]
    Empty,
}

/// Main error type for BlastUI operations
#[derive(Error, Debug)]
pub enum BlastUiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("BLAST failed: {0}")]
    Subprocess(#[from] SubprocessError),

    #[error("Parsing error: {0}")]
    Parse(#[from] ParseError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Other error: {0}")]
    Other(String),
}

impl BlastUiError {
    /// Validation and parse failures are fixed by editing the input and
    /// trying again; everything else needs the diagnostic text.
    pub fn is_user_recoverable(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Parse(_))
    }
}

/// Result type alias for BlastUI operations
pub type BlastUiResult<T> = Result<T, BlastUiError>;

// Conversion implementations for common error types
impl From<serde_json::Error> for BlastUiError {
    fn from(err: serde_json::Error) -> Self {
        BlastUiError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for BlastUiError {
    fn from(err: anyhow::Error) -> Self {
        BlastUiError::Other(err.to_string())
    }
}
