use super::write_atomic;
use crate::columns::format_float;
use crate::hit::HitRecord;
use crate::result_set::ResultSet;
use blastui_bio::{alphabet::GAP, write_fasta_to_writer, Sequence};
use blastui_core::{BlastUiResult, ExportError};
use std::path::Path;
use std::str::FromStr;

/// Which aligned string of a hit goes into the FASTA record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequenceSource {
    #[default]
    Subject,
    Query,
}

impl FromStr for SequenceSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "subject" | "sseq" => Ok(SequenceSource::Subject),
            "query" | "qseq" => Ok(SequenceSource::Query),
            other => Err(format!("unknown sequence source '{}'", other)),
        }
    }
}

fn record(hit: &HitRecord, source: SequenceSource) -> Result<Sequence, ExportError> {
    let aligned = match source {
        SequenceSource::Subject => hit.subject_seq.as_deref(),
        SequenceSource::Query => hit.query_seq.as_deref(),
    }
    .ok_or_else(|| ExportError::MissingSequence {
        query: hit.query_id.clone(),
        subject: hit.subject_id.clone(),
    })?;

    let residues: Vec<u8> = aligned.bytes().filter(|&b| b != GAP).collect();
    let description = format!(
        "query={} subject_range={}-{} query_range={}-{} evalue={}",
        hit.query_id,
        hit.subject_start,
        hit.subject_end,
        hit.query_start,
        hit.query_end,
        format_float(hit.evalue)
    );
    Ok(Sequence::new(hit.subject_id.clone(), residues).with_description(description))
}

/// One degapped record per hit
pub fn hit_sequences(results: &ResultSet, source: SequenceSource) -> Result<Vec<Sequence>, ExportError> {
    results.iter().map(|hit| record(hit, source)).collect()
}

pub fn write_hit_fasta(
    results: &ResultSet,
    path: &Path,
    source: SequenceSource,
    line_width: usize,
) -> BlastUiResult<()> {
    if results.is_empty() {
        return Err(ExportError::Empty.into());
    }
    let sequences = hit_sequences(results, source)?;
    write_atomic(path, |mut w| write_fasta_to_writer(&mut w, &sequences, line_width))?;
    Ok(())
}
