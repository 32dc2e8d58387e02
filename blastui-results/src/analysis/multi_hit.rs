use super::{AnalysisOutput, ResultAnalysis};
use crate::hit::HitRecord;
use crate::result_set::ResultSet;
use blastui_core::BlastUiResult;
use std::collections::HashMap;

/// Genomes hit more than once by the same query, e.g. gene duplications or
/// a gene split across contigs.
///
/// Subjects that are not `<genome>_NODE_<n>` ids count as their own genome.
/// Hits come back grouped by query in submission order, then by genome, with
/// ties kept in their original order.
pub struct MultiHitGenomes;

fn genome_key(hit: &HitRecord) -> (&str, &str) {
    (hit.query_id.as_str(), hit.genome().unwrap_or(&hit.subject_id))
}

impl ResultAnalysis for MultiHitGenomes {
    fn name(&self) -> &'static str {
        "multi-hit-genomes"
    }

    fn description(&self) -> &'static str {
        "Hits from genomes that a query matched more than once"
    }

    fn run(&self, results: &ResultSet) -> BlastUiResult<AnalysisOutput> {
        let mut counts: HashMap<(&str, &str), usize> = HashMap::new();
        for hit in results {
            *counts.entry(genome_key(hit)).or_default() += 1;
        }

        let query_rank = |hit: &HitRecord| {
            results
                .query_ids
                .iter()
                .position(|id| *id == hit.query_id)
                .unwrap_or(usize::MAX)
        };

        let mut hits: Vec<HitRecord> = results
            .iter()
            .filter(|hit| counts.get(&genome_key(hit)).is_some_and(|&n| n > 1))
            .cloned()
            .collect();
        hits.sort_by(|a, b| {
            query_rank(a)
                .cmp(&query_rank(b))
                .then_with(|| genome_key(a).1.cmp(genome_key(b).1))
        });

        let mut found = results.clone();
        found.hits = hits;
        Ok(AnalysisOutput::Results(found))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::OutputColumns;
    use crate::parser::parse_result_set;
    use blastui_test::fixtures;

    fn hit(query: &str, subject: &str) -> HitRecord {
        HitRecord {
            query_id: query.to_string(),
            subject_id: subject.to_string(),
            ..Default::default()
        }
    }

    fn subjects(output: AnalysisOutput) -> Vec<String> {
        match output {
            AnalysisOutput::Results(set) => set.hits.into_iter().map(|h| h.subject_id).collect(),
            AnalysisOutput::Report(_) => panic!("expected results"),
        }
    }

    #[test]
    fn test_fixture_genome_a_hit_twice() {
        let results = parse_result_set(
            fixtures::extended_payload().as_bytes(),
            &OutputColumns::default(),
            vec![],
        )
        .unwrap();
        assert_eq!(
            subjects(MultiHitGenomes.run(&results).unwrap()),
            vec!["genomeA_NODE_1", "genomeA_NODE_7"]
        );
    }

    #[test]
    fn test_hits_grouped_by_genome_within_query() {
        let results = ResultSet::with_queries(
            vec!["q2".into(), "q1".into()],
            vec![
                hit("q1", "SRR9_NODE_4"),
                hit("q2", "SRR2_NODE_1"),
                hit("q1", "SRR3_NODE_8"),
                hit("q2", "SRR1_NODE_5"),
                hit("q1", "SRR9_NODE_2"),
                hit("q2", "SRR2_NODE_3"),
                hit("q1", "SRR3_NODE_1"),
                hit("q2", "SRR1_NODE_6"),
            ],
        );
        assert_eq!(
            subjects(MultiHitGenomes.run(&results).unwrap()),
            vec![
                "SRR1_NODE_5",
                "SRR1_NODE_6",
                "SRR2_NODE_1",
                "SRR2_NODE_3",
                "SRR3_NODE_8",
                "SRR3_NODE_1",
                "SRR9_NODE_4",
                "SRR9_NODE_2",
            ]
        );
    }

    #[test]
    fn test_pairs_are_per_query() {
        let results = ResultSet::new(vec![
            hit("q1", "SRR1_NODE_1"),
            hit("q2", "SRR1_NODE_2"),
            hit("q2", "plain_subject"),
            hit("q2", "plain_subject"),
        ]);
        assert_eq!(
            subjects(MultiHitGenomes.run(&results).unwrap()),
            vec!["plain_subject", "plain_subject"]
        );
    }
}
