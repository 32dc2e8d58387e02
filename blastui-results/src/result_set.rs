use crate::export::write_atomic;
use crate::filter::{sort_hits, FilterSet, SortKey};
use crate::hit::HitRecord;
use blastui_core::{BlastProgram, BlastUiError, BlastUiResult, ExportError, ValidationError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Hits of one submission, plus the ordered ids of the queries submitted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub program: Option<BlastProgram>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub query_ids: Vec<String>,
    pub hits: Vec<HitRecord>,
}

impl ResultSet {
    pub fn new(hits: Vec<HitRecord>) -> Self {
        Self::with_queries(Vec::new(), hits)
    }

    /// Queries that appear in `hits` but not in `query_ids` are appended in
    /// first-seen order.
    pub fn with_queries(mut query_ids: Vec<String>, hits: Vec<HitRecord>) -> Self {
        for hit in &hits {
            if !query_ids.contains(&hit.query_id) {
                query_ids.push(hit.query_id.clone());
            }
        }
        Self {
            program: None,
            database: None,
            query_ids,
            hits,
        }
    }

    pub fn with_source(mut self, program: BlastProgram, database: impl Into<String>) -> Self {
        self.program = Some(program);
        self.database = Some(database.into());
        self
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HitRecord> {
        self.hits.iter()
    }

    /// Hits grouped by originating query, in submission order. Queries
    /// without hits are included with an empty group.
    pub fn by_query(&self) -> Vec<(&str, Vec<&HitRecord>)> {
        self.query_ids
            .iter()
            .map(|id| {
                let hits = self.hits.iter().filter(|h| &h.query_id == id).collect();
                (id.as_str(), hits)
            })
            .collect()
    }

    /// Same metadata and queries, different hits
    fn derive(&self, hits: Vec<HitRecord>) -> Self {
        Self {
            program: self.program,
            database: self.database.clone(),
            query_ids: self.query_ids.clone(),
            hits,
        }
    }

    pub fn filtered(&self, filters: &FilterSet) -> Self {
        self.derive(
            self.hits
                .iter()
                .filter(|h| filters.matches(h))
                .cloned()
                .collect(),
        )
    }

    /// Stable sort by the given keys; missing values sort last
    pub fn sorted(&self, keys: &[SortKey]) -> Self {
        let mut hits = self.hits.clone();
        sort_hits(&mut hits, keys);
        self.derive(hits)
    }

    /// Keep the hits at the given 0-based positions, in that order
    pub fn select(&self, rows: &[usize]) -> BlastUiResult<Self> {
        let hits = rows
            .iter()
            .map(|&row| {
                self.hits.get(row).cloned().ok_or_else(|| {
                    ValidationError::InvalidParameter(format!(
                        "row {} is out of range (the table has {} rows)",
                        row + 1,
                        self.hits.len()
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.derive(hits))
    }

    /// Drop hits above `cutoff`, returning how many were removed
    pub fn retain_evalue(&mut self, cutoff: f64) -> usize {
        let before = self.hits.len();
        self.hits.retain(|h| h.evalue <= cutoff);
        before - self.hits.len()
    }

    pub fn save_json(&self, path: &Path) -> BlastUiResult<()> {
        let json = serde_json::to_vec_pretty(self)?;
        write_atomic(path, |w| w.write_all(&json))?;
        tracing::info!("Saved {} hits to {}", self.len(), path.display());
        Ok(())
    }

    pub fn load_json(path: &Path) -> BlastUiResult<Self> {
        let bytes = fs::read(path).map_err(|source| {
            BlastUiError::Export(ExportError::Io {
                path: path.to_path_buf(),
                source,
            })
        })?;
        let mut results: ResultSet = serde_json::from_slice(&bytes)?;
        for hit in &results.hits {
            if !results.query_ids.contains(&hit.query_id) {
                results.query_ids.push(hit.query_id.clone());
            }
        }
        Ok(results)
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a HitRecord;
    type IntoIter = std::slice::Iter<'a, HitRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.iter()
    }
}
