//! A single BLAST hit

use blastui_bio::split_genome_node;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Orientation of the aligned subject segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strand {
    Plus,
    Minus,
}

impl Strand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strand::Plus => "plus",
            Strand::Minus => "minus",
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of BLAST tabular output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HitRecord {
    pub query_id: String,
    pub subject_id: String,
    pub percent_identity: f64,
    pub alignment_length: u32,
    pub mismatches: u32,
    pub gap_opens: u32,
    pub query_start: u32,
    pub query_end: u32,
    pub subject_start: u32,
    pub subject_end: u32,
    pub evalue: f64,
    pub bit_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_length: Option<u32>,
    /// Identical positions (`nident`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identical: Option<u32>,
    /// Total gap positions (`gaps`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gaps: Option<u32>,
    /// Aligned part of the query, gaps included
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_seq: Option<String>,
    /// Aligned part of the subject, gaps included
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_seq: Option<String>,
}

impl HitRecord {
    /// Query span as (low, high), independent of orientation
    pub fn query_span(&self) -> (u32, u32) {
        (
            self.query_start.min(self.query_end),
            self.query_start.max(self.query_end),
        )
    }

    /// Percentage of the query covered by this HSP, when the query length is known
    pub fn query_coverage(&self) -> Option<f64> {
        let len = self.query_length.filter(|&l| l > 0)?;
        let (lo, hi) = self.query_span();
        Some(f64::from(hi - lo + 1) * 100.0 / f64::from(len))
    }

    pub fn strand(&self) -> Strand {
        if self.subject_end < self.subject_start {
            Strand::Minus
        } else {
            Strand::Plus
        }
    }

    /// Genome part of a `<genome>_NODE_<n>` subject id
    pub fn genome(&self) -> Option<&str> {
        split_genome_node(&self.subject_id).map(|(genome, _)| genome)
    }

    /// Node part of a `<genome>_NODE_<n>` subject id
    pub fn node(&self) -> Option<&str> {
        split_genome_node(&self.subject_id).map(|(_, node)| node)
    }

    /// Range checks every hit must satisfy, whatever its source
    pub fn check(&self) -> Result<(), String> {
        if self.query_id.is_empty() {
            return Err("empty query id".to_string());
        }
        if self.subject_id.is_empty() {
            return Err("empty subject id".to_string());
        }
        if !self.evalue.is_finite() || self.evalue < 0.0 {
            return Err(format!("e-value must be a non-negative number, got {}", self.evalue));
        }
        if !(0.0..=100.0).contains(&self.percent_identity) {
            return Err(format!(
                "percent identity must be within 0..=100, got {}",
                self.percent_identity
            ));
        }
        if !self.bit_score.is_finite() {
            return Err(format!("bit score must be finite, got {}", self.bit_score));
        }
        Ok(())
    }
}
