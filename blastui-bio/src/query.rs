//! Query submission: raw text or FASTA turned into validated sub-queries

use crate::alphabet::{check_residues, GAP};
use crate::formats::fasta::{parse_fasta, parse_fasta_from_bytes, write_fasta};
use crate::sequence::Sequence;
use blastui_core::{BlastUiResult, MoleculeType, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Id given to a pasted sequence that has no FASTA header
pub const DEFAULT_QUERY_ID: &str = "Query_1";

/// One sequence of a batch; results are grouped by its id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubQuery {
    pub id: String,
    pub description: Option<String>,
    pub sequence: Vec<u8>,
}

impl SubQuery {
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    fn to_sequence(&self) -> Sequence {
        let seq = Sequence::new(self.id.clone(), self.sequence.clone());
        match &self.description {
            Some(desc) => seq.with_description(desc.clone()),
            None => seq,
        }
    }
}

/// A validated set of queries submitted together.
///
/// Every sub-query shares one molecule type and has a unique id. Ambiguity
/// codes are accepted and reported through [`QueryBatch::warnings`].
#[derive(Debug, Clone)]
pub struct QueryBatch {
    queries: Vec<SubQuery>,
    molecule: MoleculeType,
    warnings: Vec<String>,
}

impl QueryBatch {
    /// Build a batch from pasted text: FASTA if it starts with `>`, otherwise a
    /// single bare sequence named `Query_1`.
    ///
    /// When `molecule` is `None` the type is detected from the residues.
    pub fn from_text(text: &str, molecule: Option<MoleculeType>) -> BlastUiResult<Self> {
        let trimmed = text.trim_start();
        if trimmed.is_empty() {
            return Err(ValidationError::NoQueries.into());
        }

        let sequences = if trimmed.starts_with('>') {
            parse_fasta_from_bytes(trimmed.as_bytes())?
        } else {
            let residues: Vec<u8> = trimmed
                .bytes()
                .filter(|c| !c.is_ascii_whitespace())
                .map(|c| c.to_ascii_uppercase())
                .collect();
            vec![Sequence::new(DEFAULT_QUERY_ID, residues)]
        };

        Self::from_sequences(sequences, molecule)
    }

    /// Build a batch from a FASTA file (plain or .gz)
    pub fn from_fasta_file<P: AsRef<Path>>(
        path: P,
        molecule: Option<MoleculeType>,
    ) -> BlastUiResult<Self> {
        Self::from_sequences(parse_fasta(path)?, molecule)
    }

    pub fn from_sequences(
        sequences: Vec<Sequence>,
        molecule: Option<MoleculeType>,
    ) -> BlastUiResult<Self> {
        if sequences.is_empty() {
            return Err(ValidationError::NoQueries.into());
        }

        let mut warnings = Vec::new();
        let mut seen = HashSet::new();
        let mut queries = Vec::with_capacity(sequences.len());

        for seq in sequences {
            if !seen.insert(seq.id.clone()) {
                return Err(ValidationError::DuplicateQueryId(seq.id).into());
            }

            // Pasted GenBank records carry position numbers; gaps are not
            // meaningful in a query
            let gaps = seq.sequence.iter().filter(|&&c| c == GAP).count();
            let residues: Vec<u8> = seq
                .sequence
                .iter()
                .copied()
                .filter(|c| !c.is_ascii_digit() && *c != GAP)
                .collect();
            if gaps > 0 {
                warnings.push(format!("{}: removed {} gap characters", seq.id, gaps));
            }

            if residues.is_empty() {
                return Err(ValidationError::EmptySequence(seq.id).into());
            }

            queries.push(SubQuery {
                id: seq.id,
                description: seq.description,
                sequence: residues,
            });
        }

        let molecule = match molecule {
            Some(m) => m,
            None => Self::detect_molecule(&queries)?,
        };

        for query in &queries {
            let report = check_residues(&query.sequence, molecule);
            if !report.is_valid() {
                return Err(ValidationError::InvalidResidues {
                    query: query.id.clone(),
                    molecule,
                    residues: report.invalid,
                }
                .into());
            }
            if report.ambiguous_count() > 0 {
                let warning = format!(
                    "{}: {} ambiguous residues ({})",
                    query.id,
                    report.ambiguous_count(),
                    report.ambiguity_summary()
                );
                tracing::warn!("{}", warning);
                warnings.push(warning);
            }
        }

        tracing::debug!(
            "Accepted {} {} queries ({} warnings)",
            queries.len(),
            molecule,
            warnings.len()
        );

        Ok(Self {
            queries,
            molecule,
            warnings,
        })
    }

    fn detect_molecule(queries: &[SubQuery]) -> BlastUiResult<MoleculeType> {
        let first = MoleculeType::detect(&queries[0].sequence);
        for query in &queries[1..] {
            let detected = MoleculeType::detect(&query.sequence);
            if detected != first {
                return Err(ValidationError::InvalidParameter(format!(
                    "batch mixes {} and {} queries ('{}' vs '{}'); submit them separately",
                    first, detected, queries[0].id, query.id
                ))
                .into());
            }
        }
        Ok(first)
    }

    pub fn queries(&self) -> &[SubQuery] {
        &self.queries
    }

    /// Query ids in submission order
    pub fn ids(&self) -> Vec<String> {
        self.queries.iter().map(|q| q.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn molecule(&self) -> MoleculeType {
        self.molecule
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn total_residues(&self) -> usize {
        self.queries.iter().map(|q| q.len()).sum()
    }

    /// Write the batch as the FASTA file handed to BLAST
    pub fn write_fasta<P: AsRef<Path>>(&self, path: P) -> BlastUiResult<()> {
        let sequences: Vec<Sequence> = self.queries.iter().map(|q| q.to_sequence()).collect();
        write_fasta(path, &sequences, 80)
    }
}
