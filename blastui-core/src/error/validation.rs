//! Errors raised while validating queries and search parameters, before any
//! external process is launched

use crate::types::{BlastProgram, MoleculeType, ScoringMatrix};
use thiserror::Error;

/// An offending character in a query sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidResidue {
    /// 1-based position within the sequence
    pub position: usize,
    pub residue: char,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("no query sequences were provided")]
    NoQueries,

    #[error("malformed FASTA input: {0}")]
    MalformedFasta(String),

    #[error("query '{0}' has an empty sequence")]
    EmptySequence(String),

    #[error("query '{query}' contains characters outside the {molecule} alphabet: {}", format_residues(.residues))]
    InvalidResidues {
        query: String,
        molecule: MoleculeType,
        residues: Vec<InvalidResidue>,
    },

    #[error("query id '{0}' is used more than once")]
    DuplicateQueryId(String),

    #[error("{program} expects {expected} queries but '{query}' is {found}")]
    QueryTypeMismatch {
        program: BlastProgram,
        query: String,
        expected: MoleculeType,
        found: MoleculeType,
    },

    #[error("{program} searches {expected} databases but '{database}' is {found}")]
    DatabaseTypeMismatch {
        program: BlastProgram,
        database: String,
        expected: MoleculeType,
        found: MoleculeType,
    },

    #[error("scoring matrix {matrix} cannot be used with {program}")]
    IncompatibleMatrix {
        program: BlastProgram,
        matrix: ScoringMatrix,
    },

    #[error("word size {word_size} is not valid for {program} ({})", describe_range(.min, .max))]
    InvalidWordSize {
        program: BlastProgram,
        word_size: u32,
        min: u32,
        max: Option<u32>,
    },

    #[error("gap costs {open}/{extend} are not supported with {matrix}; allowed: {allowed}")]
    UnsupportedGapCosts {
        matrix: ScoringMatrix,
        open: u32,
        extend: u32,
        allowed: String,
    },

    #[error("gap costs {open}/{extend} are invalid: opening cost must not be lower than extension")]
    InvalidGapCosts { open: u32, extend: u32 },

    #[error("{0} performs ungapped alignments and does not accept gap costs")]
    UngappedProgram(BlastProgram),

    #[error("e-value cutoff must be a positive number, got {0}")]
    InvalidEvalue(f64),

    #[error("maximum target sequences must be at least 1")]
    InvalidMaxTargetSeqs,

    #[error("query coverage must be between 0 and 100, got {0}")]
    InvalidCoverage(f64),

    #[error("invalid database name '{name}': {reason}")]
    InvalidDatabaseName { name: String, reason: String },

    #[error("database '{0}' is not indexed; rebuild it before searching")]
    DatabaseNotIndexed(String),

    #[error("{0}")]
    InvalidParameter(String),
}

fn format_residues(residues: &[InvalidResidue]) -> String {
    const SHOWN: usize = 5;
    let mut parts: Vec<String> = residues
        .iter()
        .take(SHOWN)
        .map(|r| format!("'{}' at {}", r.residue, r.position))
        .collect();
    if residues.len() > SHOWN {
        parts.push(format!("and {} more", residues.len() - SHOWN));
    }
    parts.join(", ")
}

fn describe_range(min: &u32, max: &Option<u32>) -> String {
    match max {
        Some(max) => format!("must be between {} and {}", min, max),
        None => format!("must be at least {}", min),
    }
}
