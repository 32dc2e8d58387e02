//! Molecule types for queries and databases

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of residues a sequence or database is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum MoleculeType {
    /// DNA or RNA
    Nucleotide,
    /// Amino acids
    Protein,
}

impl MoleculeType {
    /// Value of the `-dbtype` flag understood by makeblastdb
    pub fn dbtype_flag(&self) -> &'static str {
        match self {
            Self::Nucleotide => "nucl",
            Self::Protein => "prot",
        }
    }

    /// Index file extensions written by makeblastdb for a single-volume database
    pub fn index_extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Nucleotide => &["nin", "nhr", "nsq"],
            Self::Protein => &["pin", "phr", "psq"],
        }
    }

    /// Extension of the alias file written for multi-volume databases
    pub fn alias_extension(&self) -> &'static str {
        match self {
            Self::Nucleotide => "nal",
            Self::Protein => "pal",
        }
    }

    /// Guess the molecule type from sequence content.
    ///
    /// More than 90% nucleotide characters (ACGTUN) is taken as nucleotide.
    pub fn detect(sequence: &[u8]) -> Self {
        let residues: Vec<u8> = sequence
            .iter()
            .filter(|c| c.is_ascii_alphabetic())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if residues.is_empty() {
            return Self::Nucleotide;
        }

        let nucleotide_count = residues
            .iter()
            .filter(|c| matches!(c, b'A' | b'C' | b'G' | b'T' | b'U' | b'N'))
            .count();

        if nucleotide_count as f32 / residues.len() as f32 > 0.9 {
            Self::Nucleotide
        } else {
            Self::Protein
        }
    }

    pub fn is_nucleotide(&self) -> bool {
        matches!(self, Self::Nucleotide)
    }

    pub fn is_protein(&self) -> bool {
        matches!(self, Self::Protein)
    }
}

impl fmt::Display for MoleculeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nucleotide => write!(f, "nucleotide"),
            Self::Protein => write!(f, "protein"),
        }
    }
}

impl FromStr for MoleculeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nucleotide" | "nucl" | "dna" | "rna" => Ok(Self::Nucleotide),
            "protein" | "prot" | "aa" => Ok(Self::Protein),
            _ => Err(format!("Unknown molecule type: {}", s)),
        }
    }
}
