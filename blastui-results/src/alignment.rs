//! Pairwise alignment text, laid out the way BLAST's own report does

use crate::hit::{HitRecord, Strand};
use crate::result_set::ResultSet;
use blastui_core::{BlastProgram, ExportError};
use std::fmt::Write;

pub const DEFAULT_ALIGNMENT_WIDTH: usize = 60;

/// Walks one side of the alignment, handing out coordinates per block
struct Cursor {
    pos: i64,
    step: i64,
    dir: i64,
    last: i64,
}

impl Cursor {
    fn new(start: u32, end: u32, step: i64) -> Self {
        let dir = if end < start { -1 } else { 1 };
        Self {
            pos: i64::from(start),
            step,
            dir,
            last: i64::from(start),
        }
    }

    /// Coordinates of the first and last residue of a block with `residues`
    /// non-gap characters
    fn advance(&mut self, residues: usize) -> (i64, i64) {
        if residues == 0 {
            return (self.last, self.last);
        }
        let first = self.pos;
        let last = first + self.dir * (residues as i64 * self.step - 1);
        self.pos = last + self.dir;
        self.last = last;
        (first, last)
    }
}

fn residues(segment: &[u8]) -> usize {
    segment.iter().filter(|&&b| b != b'-').count()
}

fn midline(query: &[u8], subject: &[u8]) -> String {
    query
        .iter()
        .zip(subject)
        .map(|(q, s)| {
            if *q != b'-' && q.eq_ignore_ascii_case(s) {
                '|'
            } else {
                ' '
            }
        })
        .collect()
}

fn percent(part: usize, whole: usize) -> usize {
    if whole == 0 {
        0
    } else {
        ((part as f64 * 100.0) / whole as f64).round() as usize
    }
}

/// Render one hit as a header block followed by `Query`/midline/`Sbjct`
/// blocks of `width` columns.
///
/// Hits without aligned sequences cannot be drawn.
pub fn format_alignment(
    hit: &HitRecord,
    program: Option<BlastProgram>,
    width: usize,
) -> Result<String, ExportError> {
    let (Some(qseq), Some(sseq)) = (hit.query_seq.as_deref(), hit.subject_seq.as_deref()) else {
        return Err(ExportError::MissingSequence {
            query: hit.query_id.clone(),
            subject: hit.subject_id.clone(),
        });
    };
    let width = width.max(1);
    let (q, s) = (qseq.as_bytes(), sseq.as_bytes());
    let columns = q.len().min(s.len());
    let mid = midline(&q[..columns], &s[..columns]);

    let identical = hit
        .identical
        .map(|n| n as usize)
        .unwrap_or_else(|| mid.bytes().filter(|&b| b == b'|').count());
    let gaps = hit.gaps.map(|n| n as usize).unwrap_or_else(|| {
        q.iter().filter(|&&b| b == b'-').count() + s.iter().filter(|&&b| b == b'-').count()
    });
    let length = (hit.alignment_length as usize).max(columns);

    let mut out = String::new();
    let _ = writeln!(out, ">{}", hit.subject_id);
    let _ = writeln!(out, "Query= {}", hit.query_id);
    let _ = writeln!(
        out,
        " Score = {} bits, Expect = {}",
        hit.bit_score,
        crate::columns::format_float(hit.evalue)
    );
    let _ = writeln!(
        out,
        " Identities = {}/{} ({}%), Gaps = {}/{} ({}%)",
        identical,
        length,
        percent(identical, length),
        gaps,
        length,
        percent(gaps, length)
    );
    if matches!(program, None | Some(BlastProgram::Blastn)) {
        let strand = match hit.strand() {
            Strand::Plus => "Plus",
            Strand::Minus => "Minus",
        };
        let _ = writeln!(out, " Strand = Plus/{}", strand);
    }
    out.push('\n');

    let query_step = match program {
        Some(BlastProgram::Blastx) | Some(BlastProgram::Tblastx) => 3,
        _ => 1,
    };
    let subject_step = match program {
        Some(BlastProgram::Tblastn) | Some(BlastProgram::Tblastx) => 3,
        _ => 1,
    };
    let mut qcur = Cursor::new(hit.query_start, hit.query_end, query_step);
    let mut scur = Cursor::new(hit.subject_start, hit.subject_end, subject_step);
    let pad = [hit.query_start, hit.query_end, hit.subject_start, hit.subject_end]
        .iter()
        .map(|n| n.to_string().len())
        .max()
        .unwrap_or(1);

    for start in (0..columns).step_by(width) {
        let end = (start + width).min(columns);
        let (qseg, sseg) = (&q[start..end], &s[start..end]);
        let (q1, q2) = qcur.advance(residues(qseg));
        let (s1, s2) = scur.advance(residues(sseg));

        let _ = writeln!(
            out,
            "Query  {:<pad$}  {}  {}",
            q1,
            String::from_utf8_lossy(qseg),
            q2,
            pad = pad
        );
        let _ = writeln!(out, "       {:pad$}  {}", "", &mid[start..end], pad = pad);
        let _ = writeln!(
            out,
            "Sbjct  {:<pad$}  {}  {}",
            s1,
            String::from_utf8_lossy(sseg),
            s2,
            pad = pad
        );
        out.push('\n');
    }

    Ok(out)
}

/// Every alignment of the set, separated by blank lines
pub fn format_alignments(results: &ResultSet, width: usize) -> Result<String, ExportError> {
    let blocks = results
        .iter()
        .map(|hit| format_alignment(hit, results.program, width))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(blocks.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::OutputColumns;
    use crate::parser::parse_result_set;
    use blastui_test::fixtures;
    use pretty_assertions::assert_eq;

    fn hits() -> Vec<HitRecord> {
        parse_result_set(
            fixtures::extended_payload().as_bytes(),
            &OutputColumns::default(),
            vec![],
        )
        .unwrap()
        .hits
    }

    #[test]
    fn test_gapped_alignment_block() {
        let text = format_alignment(&hits()[2], Some(BlastProgram::Blastn), 60).unwrap();
        let expected = "\
>genomeA_NODE_7
Query= query_1
 Score = 16.5 bits, Expect = 0.12
 Identities = 10/12 (83%), Gaps = 1/12 (8%)
 Strand = Plus/Plus

Query  1   ATGCG-ACGTTA  11
           ||||| || |||
Sbjct  40  ATGCGTACCTTA  51

";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_minus_strand_coordinates_descend() {
        let text = format_alignment(&hits()[1], None, 60).unwrap();
        assert!(text.contains(" Strand = Plus/Minus"));
        assert!(text.contains("Sbjct  212  ATGCGAACGTTA  201"));
    }

    #[test]
    fn test_blocks_wrap_at_width() {
        let text = format_alignment(&hits()[3], Some(BlastProgram::Blastn), 8).unwrap();
        let query_lines: Vec<&str> = text.lines().filter(|l| l.starts_with("Query ")).collect();
        assert_eq!(
            query_lines,
            vec![
                "Query  3   GGCATTAC  10",
                "Query  11  GATCGATC  18",
                "Query  19  GGAT  22",
            ]
        );
    }

    #[test]
    fn test_protein_programs_omit_strand() {
        let text = format_alignment(&hits()[0], Some(BlastProgram::Blastp), 60).unwrap();
        assert!(!text.contains("Strand"));
    }

    #[test]
    fn test_missing_sequences() {
        let mut hit = hits()[0].clone();
        hit.subject_seq = None;
        let err = format_alignment(&hit, None, 60).unwrap_err();
        assert!(matches!(err, ExportError::MissingSequence { .. }));
    }

    #[test]
    fn test_alignments_joined_by_blank_line() {
        let results = ResultSet::new(hits());
        let text = format_alignments(&results, 60).unwrap();
        assert_eq!(text.matches(">genome").count(), 4);
        assert!(text.contains("\n\n\n>genomeB_NODE_3"));
    }
}
