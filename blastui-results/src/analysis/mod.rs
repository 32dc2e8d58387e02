//! Post-search analyses over a ResultSet
//!
//! Each analysis is a [`ResultAnalysis`] registered by name in an
//! [`AnalysisRegistry`]. Built-ins:
//!
//! - `stop-codons`: hits whose aligned subject contains a stop (`*`)
//! - `multi-hit-genomes`: hits from genomes matched more than once by the same query
//! - `query-summary`: per-query hit counts and best scores as a text report

mod multi_hit;
mod stop_codons;
mod summary;

pub use multi_hit::MultiHitGenomes;
pub use stop_codons::StopCodons;
pub use summary::QuerySummaryReport;

use crate::result_set::ResultSet;
use blastui_core::{BlastUiError, BlastUiResult};
use std::collections::BTreeMap;

/// What an analysis produces
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutput {
    /// A derived subset that can be shown, filtered and exported like any other
    Results(ResultSet),
    Report(String),
}

pub trait ResultAnalysis: Send + Sync {
    /// Registry key, e.g. `stop-codons`
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn run(&self, results: &ResultSet) -> BlastUiResult<AnalysisOutput>;
}

pub struct AnalysisRegistry {
    analyses: BTreeMap<&'static str, Box<dyn ResultAnalysis>>,
}

impl AnalysisRegistry {
    pub fn empty() -> Self {
        Self {
            analyses: BTreeMap::new(),
        }
    }

    /// Registry holding the built-in analyses
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(StopCodons));
        registry.register(Box::new(MultiHitGenomes));
        registry.register(Box::new(QuerySummaryReport));
        registry
    }

    /// Add an analysis, replacing any with the same name
    pub fn register(&mut self, analysis: Box<dyn ResultAnalysis>) {
        self.analyses.insert(analysis.name(), analysis);
    }

    pub fn get(&self, name: &str) -> Option<&dyn ResultAnalysis> {
        self.analyses.get(name).map(|a| a.as_ref())
    }

    /// Analyses sorted by name
    pub fn list(&self) -> impl Iterator<Item = &dyn ResultAnalysis> {
        self.analyses.values().map(|a| a.as_ref())
    }

    pub fn run(&self, name: &str, results: &ResultSet) -> BlastUiResult<AnalysisOutput> {
        let analysis = self.get(name).ok_or_else(|| {
            BlastUiError::NotFound(format!(
                "analysis '{}' (available: {})",
                name,
                self.analyses.keys().copied().collect::<Vec<_>>().join(", ")
            ))
        })?;
        tracing::info!("Running analysis '{}' over {} hits", name, results.len());
        analysis.run(results)
    }
}

impl Default for AnalysisRegistry {
    fn default() -> Self {
        Self::new()
    }
}
