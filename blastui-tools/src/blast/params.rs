//! Search parameters and their fail-fast validation

use blastui_core::config::BlastConfig;
use blastui_core::{BlastProgram, MoleculeType, ScoringMatrix, ValidationError};
use serde::{Deserialize, Serialize};

/// User-tunable BLAST parameters.
///
/// `None` leaves the choice to BLAST's own default for the program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    pub evalue: f64,
    pub max_target_seqs: usize,
    pub word_size: Option<u32>,
    pub matrix: Option<ScoringMatrix>,
    /// (open, extend)
    pub gap_costs: Option<(u32, u32)>,
    /// Minimum query coverage per HSP in percent
    pub qcov_hsp_perc: Option<f64>,
    /// 0 = all available cores
    pub threads: usize,
    /// DUST for nucleotide queries, SEG for protein queries
    pub low_complexity_filter: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            evalue: 10.0,
            max_target_seqs: 500,
            word_size: None,
            matrix: None,
            gap_costs: None,
            qcov_hsp_perc: None,
            threads: 0,
            low_complexity_filter: true,
        }
    }
}

impl SearchParams {
    /// Defaults taken from the `[blast]` configuration section
    pub fn from_config(config: &BlastConfig) -> Self {
        Self {
            evalue: config.evalue,
            max_target_seqs: config.max_target_seqs,
            qcov_hsp_perc: (config.qcov_hsp_perc > 0.0).then_some(config.qcov_hsp_perc),
            threads: config.threads,
            ..Self::default()
        }
    }

    /// Matrix actually used by BLAST for protein scoring
    pub fn effective_matrix(&self) -> ScoringMatrix {
        self.matrix.unwrap_or_default()
    }

    /// Thread count handed to `-num_threads`
    pub fn effective_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }

    /// Check the parameters themselves for `program`
    pub fn validate(&self, program: BlastProgram) -> Result<(), ValidationError> {
        if !self.evalue.is_finite() || self.evalue <= 0.0 {
            return Err(ValidationError::InvalidEvalue(self.evalue));
        }

        if self.max_target_seqs == 0 {
            return Err(ValidationError::InvalidMaxTargetSeqs);
        }

        if let Some(coverage) = self.qcov_hsp_perc {
            if !(0.0..=100.0).contains(&coverage) || coverage.is_nan() {
                return Err(ValidationError::InvalidCoverage(coverage));
            }
        }

        if let Some(matrix) = self.matrix {
            if !program.uses_matrix() {
                return Err(ValidationError::IncompatibleMatrix { program, matrix });
            }
        }

        if let Some(word_size) = self.word_size {
            let (min, max) = program.word_size_range();
            if word_size < min || max.is_some_and(|max| word_size > max) {
                return Err(ValidationError::InvalidWordSize {
                    program,
                    word_size,
                    min,
                    max,
                });
            }
        }

        if let Some((open, extend)) = self.gap_costs {
            if !program.is_gapped() {
                return Err(ValidationError::UngappedProgram(program));
            }

            if program.uses_matrix() {
                let matrix = self.effective_matrix();
                if !matrix.accepts_gap_costs(open, extend) {
                    let allowed = matrix
                        .allowed_gap_costs()
                        .iter()
                        .map(|(o, e)| format!("{}/{}", o, e))
                        .collect::<Vec<_>>()
                        .join(", ");
                    return Err(ValidationError::UnsupportedGapCosts {
                        matrix,
                        open,
                        extend,
                        allowed,
                    });
                }
            } else if open < extend {
                return Err(ValidationError::InvalidGapCosts { open, extend });
            }
        }

        Ok(())
    }

    /// Full pre-launch check: parameters, then query and database molecule types
    pub fn validate_search(
        &self,
        program: BlastProgram,
        query_label: &str,
        query_molecule: MoleculeType,
        database_name: &str,
        database_molecule: MoleculeType,
    ) -> Result<(), ValidationError> {
        self.validate(program)?;

        if query_molecule != program.query_type() {
            return Err(ValidationError::QueryTypeMismatch {
                program,
                query: query_label.to_string(),
                expected: program.query_type(),
                found: query_molecule,
            });
        }

        if database_molecule != program.database_type() {
            return Err(ValidationError::DatabaseTypeMismatch {
                program,
                database: database_name.to_string(),
                expected: program.database_type(),
                found: database_molecule,
            });
        }

        Ok(())
    }
}
