use super::{AnalysisOutput, ResultAnalysis};
use crate::columns::format_float;
use crate::result_set::ResultSet;
use crate::summary::summarize;
use blastui_core::BlastUiResult;
use std::fmt::Write;

pub struct QuerySummaryReport;

impl ResultAnalysis for QuerySummaryReport {
    fn name(&self) -> &'static str {
        "query-summary"
    }

    fn description(&self) -> &'static str {
        "Hit count, best identity and best e-value for every query"
    }

    fn run(&self, results: &ResultSet) -> BlastUiResult<AnalysisOutput> {
        let mut report = String::new();
        let mut without_hits = 0;
        for summary in summarize(results) {
            match (summary.best_identity, summary.best_evalue) {
                (Some(identity), Some(evalue)) => {
                    let _ = writeln!(
                        report,
                        "{}: {} hits in {} subjects, best identity {:.2}%, best e-value {}",
                        summary.query_id,
                        summary.hits,
                        summary.subjects,
                        identity,
                        format_float(evalue)
                    );
                }
                _ => {
                    without_hits += 1;
                    let _ = writeln!(report, "{}: no hits", summary.query_id);
                }
            }
        }
        if without_hits > 0 {
            let _ = writeln!(report, "{} queries without hits", without_hits);
        }
        Ok(AnalysisOutput::Report(report))
    }
}
