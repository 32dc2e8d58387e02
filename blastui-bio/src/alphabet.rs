//! Residue alphabets accepted for BLAST queries

use blastui_core::{InvalidResidue, MoleculeType};
use std::collections::BTreeMap;

pub const NUCLEOTIDE_STANDARD: &[u8] = b"ACGTU";
/// IUPAC nucleotide ambiguity codes
pub const NUCLEOTIDE_AMBIGUOUS: &[u8] = b"NRYKMSWBDHV";
pub const PROTEIN_STANDARD: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";
/// Ambiguous or non-standard amino acids (B, Z, X, J) plus selenocysteine and pyrrolysine
pub const PROTEIN_AMBIGUOUS: &[u8] = b"BZXJUO";
pub const GAP: u8 = b'-';
pub const STOP: u8 = b'*';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResidueClass {
    Standard,
    Ambiguous,
    Gap,
    Stop,
    Invalid,
}

/// Classify a single residue (case-insensitive)
pub fn classify(residue: u8, molecule: MoleculeType) -> ResidueClass {
    let upper = residue.to_ascii_uppercase();
    if upper == GAP {
        return ResidueClass::Gap;
    }
    match molecule {
        MoleculeType::Nucleotide => {
            if NUCLEOTIDE_STANDARD.contains(&upper) {
                ResidueClass::Standard
            } else if NUCLEOTIDE_AMBIGUOUS.contains(&upper) {
                ResidueClass::Ambiguous
            } else {
                ResidueClass::Invalid
            }
        }
        MoleculeType::Protein => {
            if PROTEIN_STANDARD.contains(&upper) {
                ResidueClass::Standard
            } else if PROTEIN_AMBIGUOUS.contains(&upper) {
                ResidueClass::Ambiguous
            } else if upper == STOP {
                ResidueClass::Stop
            } else {
                ResidueClass::Invalid
            }
        }
    }
}

/// Outcome of checking a sequence against an alphabet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResidueReport {
    pub invalid: Vec<InvalidResidue>,
    /// Ambiguity codes and how often each occurs
    pub ambiguous: BTreeMap<char, usize>,
}

impl ResidueReport {
    pub fn is_valid(&self) -> bool {
        self.invalid.is_empty()
    }

    pub fn ambiguous_count(&self) -> usize {
        self.ambiguous.values().sum()
    }

    /// Human-readable summary of the ambiguity codes found, e.g. `N×3, R×1`
    pub fn ambiguity_summary(&self) -> String {
        self.ambiguous
            .iter()
            .map(|(c, n)| format!("{}×{}", c, n))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub fn check_residues(sequence: &[u8], molecule: MoleculeType) -> ResidueReport {
    let mut report = ResidueReport::default();
    for (i, &residue) in sequence.iter().enumerate() {
        match classify(residue, molecule) {
            ResidueClass::Invalid => report.invalid.push(InvalidResidue {
                position: i + 1,
                residue: residue as char,
            }),
            ResidueClass::Ambiguous => {
                *report
                    .ambiguous
                    .entry(residue.to_ascii_uppercase() as char)
                    .or_insert(0) += 1;
            }
            _ => {}
        }
    }
    report
}
