//! Amino-acid substitution matrices and the gap costs BLAST accepts for them

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ScoringMatrix {
    Blosum45,
    Blosum50,
    Blosum62,
    Blosum80,
    Blosum90,
    Pam30,
    Pam70,
    Pam250,
}

impl ScoringMatrix {
    pub fn all() -> &'static [ScoringMatrix] {
        &[
            Self::Blosum45,
            Self::Blosum50,
            Self::Blosum62,
            Self::Blosum80,
            Self::Blosum90,
            Self::Pam30,
            Self::Pam70,
            Self::Pam250,
        ]
    }

    /// Name passed to `-matrix`
    pub fn name(&self) -> &'static str {
        match self {
            Self::Blosum45 => "BLOSUM45",
            Self::Blosum50 => "BLOSUM50",
            Self::Blosum62 => "BLOSUM62",
            Self::Blosum80 => "BLOSUM80",
            Self::Blosum90 => "BLOSUM90",
            Self::Pam30 => "PAM30",
            Self::Pam70 => "PAM70",
            Self::Pam250 => "PAM250",
        }
    }

    /// (open, extend) pairs BLAST+ accepts with this matrix
    pub fn allowed_gap_costs(&self) -> &'static [(u32, u32)] {
        match self {
            Self::Blosum45 => &[
                (13, 3), (12, 3), (11, 3), (10, 3),
                (15, 2), (14, 2), (13, 2), (12, 2),
                (19, 1), (18, 1), (17, 1), (16, 1),
            ],
            Self::Blosum50 => &[
                (13, 3), (12, 3), (11, 3), (10, 3), (9, 3),
                (16, 2), (15, 2), (14, 2), (13, 2), (12, 2),
                (19, 1), (18, 1), (17, 1), (16, 1), (15, 1),
            ],
            Self::Blosum62 => &[
                (11, 2), (10, 2), (9, 2), (8, 2), (7, 2), (6, 2),
                (13, 1), (12, 1), (11, 1), (10, 1), (9, 1),
            ],
            Self::Blosum80 => &[
                (25, 2), (13, 2), (9, 2), (8, 2), (7, 2), (6, 2),
                (11, 1), (10, 1), (9, 1),
            ],
            Self::Blosum90 => &[
                (9, 2), (8, 2), (7, 2), (6, 2),
                (11, 1), (10, 1), (9, 1),
            ],
            Self::Pam30 => &[
                (7, 2), (6, 2), (5, 2),
                (10, 1), (9, 1), (8, 1),
                (15, 3), (14, 2), (14, 1), (13, 3),
            ],
            Self::Pam70 => &[
                (8, 2), (7, 2), (6, 2),
                (11, 1), (10, 1), (9, 1),
                (12, 3), (11, 2),
            ],
            Self::Pam250 => &[
                (15, 3), (14, 3), (13, 3), (12, 3), (11, 3),
                (17, 2), (16, 2), (15, 2), (14, 2), (13, 2),
                (21, 1), (20, 1), (19, 1), (18, 1), (17, 1),
            ],
        }
    }

    /// Gap costs BLAST+ uses when none are given
    pub fn default_gap_costs(&self) -> (u32, u32) {
        match self {
            Self::Blosum45 => (15, 2),
            Self::Blosum50 => (13, 2),
            Self::Blosum62 => (11, 1),
            Self::Blosum80 => (10, 1),
            Self::Blosum90 => (10, 1),
            Self::Pam30 => (9, 1),
            Self::Pam70 => (10, 1),
            Self::Pam250 => (14, 2),
        }
    }

    pub fn accepts_gap_costs(&self, open: u32, extend: u32) -> bool {
        self.allowed_gap_costs().contains(&(open, extend))
    }
}

impl Default for ScoringMatrix {
    fn default() -> Self {
        Self::Blosum62
    }
}

impl fmt::Display for ScoringMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ScoringMatrix {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Unknown scoring matrix: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gap_costs_are_allowed() {
        for matrix in ScoringMatrix::all() {
            let (open, extend) = matrix.default_gap_costs();
            assert!(
                matrix.accepts_gap_costs(open, extend),
                "{} default {}/{} not in its allowed table",
                matrix,
                open,
                extend
            );
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("blosum62".parse::<ScoringMatrix>().unwrap(), ScoringMatrix::Blosum62);
        assert_eq!("PAM30".parse::<ScoringMatrix>().unwrap(), ScoringMatrix::Pam30);
        assert!("BLOSUM100".parse::<ScoringMatrix>().is_err());
    }

    #[test]
    fn test_rejects_unknown_pair() {
        assert!(!ScoringMatrix::Blosum62.accepts_gap_costs(5, 5));
        assert!(ScoringMatrix::Blosum62.accepts_gap_costs(11, 1));
    }
}
