use crate::hit::HitRecord;
use crate::result_set::ResultSet;
use serde::Serialize;
use std::collections::HashSet;

/// True when `candidate` should replace `best`: higher bit score, then lower
/// e-value. Full ties keep the earlier hit.
fn outranks(candidate: &HitRecord, best: &HitRecord) -> bool {
    candidate.bit_score > best.bit_score
        || (candidate.bit_score == best.bit_score && candidate.evalue < best.evalue)
}

/// Best hit of each query with hits, in submission order
pub fn best_hit_per_query(results: &ResultSet) -> Vec<&HitRecord> {
    results
        .by_query()
        .into_iter()
        .filter_map(|(_, hits)| {
            hits.into_iter().reduce(|best, hit| if outranks(hit, best) { hit } else { best })
        })
        .collect()
}

/// The best hits as a ResultSet of their own
pub fn best_hits(results: &ResultSet) -> ResultSet {
    let mut best = results.clone();
    best.hits = best_hit_per_query(results).into_iter().cloned().collect();
    best
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuerySummary {
    pub query_id: String,
    pub hits: usize,
    pub subjects: usize,
    pub best_identity: Option<f64>,
    pub best_evalue: Option<f64>,
    pub best_bit_score: Option<f64>,
}

/// One line per submitted query, including queries without hits
pub fn summarize(results: &ResultSet) -> Vec<QuerySummary> {
    results
        .by_query()
        .into_iter()
        .map(|(query, hits)| {
            let subjects: HashSet<&str> = hits.iter().map(|h| h.subject_id.as_str()).collect();
            QuerySummary {
                query_id: query.to_string(),
                hits: hits.len(),
                subjects: subjects.len(),
                best_identity: hits.iter().map(|h| h.percent_identity).reduce(f64::max),
                best_evalue: hits.iter().map(|h| h.evalue).reduce(f64::min),
                best_bit_score: hits.iter().map(|h| h.bit_score).reduce(f64::max),
            }
        })
        .collect()
}
