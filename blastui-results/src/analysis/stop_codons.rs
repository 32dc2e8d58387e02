use super::{AnalysisOutput, ResultAnalysis};
use crate::result_set::ResultSet;
use blastui_bio::alphabet::STOP;
use blastui_core::{BlastUiResult, ValidationError};

pub struct StopCodons;

impl ResultAnalysis for StopCodons {
    fn name(&self) -> &'static str {
        "stop-codons"
    }

    fn description(&self) -> &'static str {
        "Hits whose aligned subject sequence contains a stop codon (*)"
    }

    fn run(&self, results: &ResultSet) -> BlastUiResult<AnalysisOutput> {
        if !results.is_empty() && results.iter().all(|h| h.subject_seq.is_none()) {
            return Err(ValidationError::InvalidParameter(
                "stop-codons needs aligned subject sequences (sseq) in the results".to_string(),
            )
            .into());
        }

        let mut found = results.clone();
        found.hits.retain(|hit| {
            hit.subject_seq
                .as_deref()
                .is_some_and(|seq| seq.as_bytes().contains(&STOP))
        });
        tracing::debug!("{} of {} hits contain a stop", found.len(), results.len());
        Ok(AnalysisOutput::Results(found))
    }
}
