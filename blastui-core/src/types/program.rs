//! BLAST search programs

use super::MoleculeType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The five BLAST+ search programs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum BlastProgram {
    Blastn,
    Blastp,
    Blastx,
    Tblastn,
    Tblastx,
}

impl BlastProgram {
    pub fn all() -> &'static [BlastProgram] {
        &[
            Self::Blastn,
            Self::Blastp,
            Self::Blastx,
            Self::Tblastn,
            Self::Tblastx,
        ]
    }

    /// Executable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Blastn => "blastn",
            Self::Blastp => "blastp",
            Self::Blastx => "blastx",
            Self::Tblastn => "tblastn",
            Self::Tblastx => "tblastx",
        }
    }

    /// Molecule type the program expects for its queries
    pub fn query_type(&self) -> MoleculeType {
        match self {
            Self::Blastn | Self::Blastx | Self::Tblastx => MoleculeType::Nucleotide,
            Self::Blastp | Self::Tblastn => MoleculeType::Protein,
        }
    }

    /// Molecule type the program expects for its database
    pub fn database_type(&self) -> MoleculeType {
        match self {
            Self::Blastn | Self::Tblastn | Self::Tblastx => MoleculeType::Nucleotide,
            Self::Blastp | Self::Blastx => MoleculeType::Protein,
        }
    }

    /// Whether alignments are scored with an amino-acid substitution matrix
    pub fn uses_matrix(&self) -> bool {
        !matches!(self, Self::Blastn)
    }

    /// tblastx only produces ungapped alignments
    pub fn is_gapped(&self) -> bool {
        !matches!(self, Self::Tblastx)
    }

    /// Accepted word sizes as (min, max)
    pub fn word_size_range(&self) -> (u32, Option<u32>) {
        match self {
            Self::Blastn => (4, None),
            _ => (2, Some(7)),
        }
    }

    pub fn default_word_size(&self) -> u32 {
        match self {
            Self::Blastn => 28,
            _ => 3,
        }
    }

    /// Whether the query or the database is translated before comparison
    pub fn is_translated(&self) -> bool {
        matches!(self, Self::Blastx | Self::Tblastn | Self::Tblastx)
    }
}

impl fmt::Display for BlastProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for BlastProgram {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "blastn" => Ok(Self::Blastn),
            "blastp" => Ok(Self::Blastp),
            "blastx" => Ok(Self::Blastx),
            "tblastn" => Ok(Self::Tblastn),
            "tblastx" => Ok(Self::Tblastx),
            _ => Err(format!("Unknown BLAST program: {}", s)),
        }
    }
}
