//! Column layout of BLAST tabular output

use crate::hit::HitRecord;
use blastui_core::ValidationError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A field of a hit: one of BLAST's `-outfmt 6` specifiers or a value
/// derived from them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    QueryId,
    SubjectId,
    PercentIdentity,
    AlignmentLength,
    Mismatches,
    GapOpens,
    QueryStart,
    QueryEnd,
    SubjectStart,
    SubjectEnd,
    Evalue,
    BitScore,
    QueryLength,
    SubjectLength,
    Identical,
    Gaps,
    QuerySeq,
    SubjectSeq,
    QueryCoverage,
    Strand,
    Genome,
    Node,
}

/// The twelve columns of `-outfmt 6` with no specifiers, all of which a hit needs
pub const REQUIRED_COLUMNS: [Column; 12] = [
    Column::QueryId,
    Column::SubjectId,
    Column::PercentIdentity,
    Column::AlignmentLength,
    Column::Mismatches,
    Column::GapOpens,
    Column::QueryStart,
    Column::QueryEnd,
    Column::SubjectStart,
    Column::SubjectEnd,
    Column::Evalue,
    Column::BitScore,
];

const EXTENDED_COLUMNS: [Column; 6] = [
    Column::QueryLength,
    Column::SubjectLength,
    Column::Identical,
    Column::Gaps,
    Column::QuerySeq,
    Column::SubjectSeq,
];

impl Column {
    pub fn all() -> Vec<Column> {
        let mut all = Self::blast_columns();
        all.extend([
            Column::QueryCoverage,
            Column::Strand,
            Column::Genome,
            Column::Node,
        ]);
        all
    }

    /// Columns BLAST itself can emit, in the default search order
    pub fn blast_columns() -> Vec<Column> {
        REQUIRED_COLUMNS
            .iter()
            .chain(EXTENDED_COLUMNS.iter())
            .copied()
            .collect()
    }

    /// Short name; the `-outfmt` specifier for BLAST columns
    pub fn key(&self) -> &'static str {
        match self {
            Column::QueryId => "qseqid",
            Column::SubjectId => "sseqid",
            Column::PercentIdentity => "pident",
            Column::AlignmentLength => "length",
            Column::Mismatches => "mismatch",
            Column::GapOpens => "gapopen",
            Column::QueryStart => "qstart",
            Column::QueryEnd => "qend",
            Column::SubjectStart => "sstart",
            Column::SubjectEnd => "send",
            Column::Evalue => "evalue",
            Column::BitScore => "bitscore",
            Column::QueryLength => "qlen",
            Column::SubjectLength => "slen",
            Column::Identical => "nident",
            Column::Gaps => "gaps",
            Column::QuerySeq => "qseq",
            Column::SubjectSeq => "sseq",
            Column::QueryCoverage => "qcov",
            Column::Strand => "strand",
            Column::Genome => "genome",
            Column::Node => "node",
        }
    }

    /// Table heading
    pub fn header(&self) -> &'static str {
        match self {
            Column::QueryId => "Query",
            Column::SubjectId => "Subject",
            Column::PercentIdentity => "% Identity",
            Column::AlignmentLength => "Length",
            Column::Mismatches => "Mismatches",
            Column::GapOpens => "Gap opens",
            Column::QueryStart => "Q. start",
            Column::QueryEnd => "Q. end",
            Column::SubjectStart => "S. start",
            Column::SubjectEnd => "S. end",
            Column::Evalue => "E-value",
            Column::BitScore => "Bit score",
            Column::QueryLength => "Q. len",
            Column::SubjectLength => "S. len",
            Column::Identical => "Identical",
            Column::Gaps => "Gaps",
            Column::QuerySeq => "Query seq",
            Column::SubjectSeq => "Subject seq",
            Column::QueryCoverage => "% Q. cover",
            Column::Strand => "Strand",
            Column::Genome => "Genome",
            Column::Node => "Node",
        }
    }

    pub fn is_derived(&self) -> bool {
        matches!(
            self,
            Column::QueryCoverage | Column::Strand | Column::Genome | Column::Node
        )
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(
            self,
            Column::QueryId
                | Column::SubjectId
                | Column::QuerySeq
                | Column::SubjectSeq
                | Column::Strand
                | Column::Genome
                | Column::Node
        )
    }

    pub fn value<'a>(&self, hit: &'a HitRecord) -> Cell<'a> {
        match self {
            Column::QueryId => Cell::Text(&hit.query_id),
            Column::SubjectId => Cell::Text(&hit.subject_id),
            Column::PercentIdentity => Cell::Float(hit.percent_identity),
            Column::AlignmentLength => Cell::Int(hit.alignment_length),
            Column::Mismatches => Cell::Int(hit.mismatches),
            Column::GapOpens => Cell::Int(hit.gap_opens),
            Column::QueryStart => Cell::Int(hit.query_start),
            Column::QueryEnd => Cell::Int(hit.query_end),
            Column::SubjectStart => Cell::Int(hit.subject_start),
            Column::SubjectEnd => Cell::Int(hit.subject_end),
            Column::Evalue => Cell::Float(hit.evalue),
            Column::BitScore => Cell::Float(hit.bit_score),
            Column::QueryLength => hit.query_length.map_or(Cell::Missing, Cell::Int),
            Column::SubjectLength => hit.subject_length.map_or(Cell::Missing, Cell::Int),
            Column::Identical => hit.identical.map_or(Cell::Missing, Cell::Int),
            Column::Gaps => hit.gaps.map_or(Cell::Missing, Cell::Int),
            Column::QuerySeq => hit.query_seq.as_deref().map_or(Cell::Missing, Cell::Text),
            Column::SubjectSeq => hit.subject_seq.as_deref().map_or(Cell::Missing, Cell::Text),
            Column::QueryCoverage => hit.query_coverage().map_or(Cell::Missing, Cell::Float),
            Column::Strand => Cell::Text(hit.strand().as_str()),
            Column::Genome => hit.genome().map_or(Cell::Missing, Cell::Text),
            Column::Node => hit.node().map_or(Cell::Missing, Cell::Text),
        }
    }

    /// Store a raw field into `hit`. Derived columns are ignored and an
    /// empty field leaves an optional column unset.
    pub fn assign(&self, hit: &mut HitRecord, raw: &str) -> Result<(), String> {
        let raw = raw.trim();
        match self {
            Column::QueryId => hit.query_id = raw.to_string(),
            Column::SubjectId => hit.subject_id = raw.to_string(),
            Column::PercentIdentity => hit.percent_identity = self.parse_float(raw)?,
            Column::AlignmentLength => hit.alignment_length = self.parse_int(raw)?,
            Column::Mismatches => hit.mismatches = self.parse_int(raw)?,
            Column::GapOpens => hit.gap_opens = self.parse_int(raw)?,
            Column::QueryStart => hit.query_start = self.parse_int(raw)?,
            Column::QueryEnd => hit.query_end = self.parse_int(raw)?,
            Column::SubjectStart => hit.subject_start = self.parse_int(raw)?,
            Column::SubjectEnd => hit.subject_end = self.parse_int(raw)?,
            Column::Evalue => hit.evalue = self.parse_float(raw)?,
            Column::BitScore => hit.bit_score = self.parse_float(raw)?,
            Column::QueryLength => hit.query_length = self.parse_optional_int(raw)?,
            Column::SubjectLength => hit.subject_length = self.parse_optional_int(raw)?,
            Column::Identical => hit.identical = self.parse_optional_int(raw)?,
            Column::Gaps => hit.gaps = self.parse_optional_int(raw)?,
            Column::QuerySeq => hit.query_seq = non_empty(raw),
            Column::SubjectSeq => hit.subject_seq = non_empty(raw),
            Column::QueryCoverage | Column::Strand | Column::Genome | Column::Node => {}
        }
        Ok(())
    }

    fn parse_float(&self, raw: &str) -> Result<f64, String> {
        raw.parse::<f64>()
            .map_err(|_| format!("{}: expected a number, got '{}'", self.key(), raw))
    }

    fn parse_int(&self, raw: &str) -> Result<u32, String> {
        raw.parse::<u32>()
            .map_err(|_| format!("{}: expected an integer, got '{}'", self.key(), raw))
    }

    fn parse_optional_int(&self, raw: &str) -> Result<Option<u32>, String> {
        if raw.is_empty() {
            Ok(None)
        } else {
            self.parse_int(raw).map(Some)
        }
    }
}

fn non_empty(raw: &str) -> Option<String> {
    (!raw.is_empty()).then(|| raw.to_string())
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if let Some(column) = Column::all().into_iter().find(|c| c.key() == lower) {
            return Ok(column);
        }
        match lower.as_str() {
            "query" | "query_id" => Ok(Column::QueryId),
            "subject" | "subject_id" => Ok(Column::SubjectId),
            "identity" | "percent_identity" => Ok(Column::PercentIdentity),
            "alignment_length" => Ok(Column::AlignmentLength),
            "e-value" | "e_value" => Ok(Column::Evalue),
            "score" | "bit_score" => Ok(Column::BitScore),
            "coverage" | "qcovhsp" | "query_coverage" => Ok(Column::QueryCoverage),
            "strain" => Ok(Column::Genome),
            _ => Err(format!("unknown column '{}'", s.trim())),
        }
    }
}

/// A borrowed cell value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Text(&'a str),
    Int(u32),
    Float(f64),
    Missing,
}

impl Cell<'_> {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(v) => Some(f64::from(*v)),
            Cell::Float(v) => Some(*v),
            Cell::Text(_) | Cell::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Order two cells of the same column; missing cells compare equal here
    /// and are placed by the caller
    pub fn compare(&self, other: &Cell<'_>) -> Ordering {
        match (self, other) {
            (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
            (Cell::Int(a), Cell::Int(b)) => a.cmp(b),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                _ => Ordering::Equal,
            },
        }
    }
}

impl fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Int(v) => write!(f, "{}", v),
            Cell::Float(v) => f.write_str(&format_float(*v)),
            Cell::Missing => Ok(()),
        }
    }
}

/// Shortest text that parses back to exactly `value`
pub fn format_float(value: f64) -> String {
    let abs = value.abs();
    if abs != 0.0 && !(1e-4..1e16).contains(&abs) {
        format!("{:e}", value)
    } else {
        format!("{}", value)
    }
}

/// Explicit layout of the tab-separated fields BLAST was asked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputColumns(Vec<Column>);

impl OutputColumns {
    pub fn new(columns: Vec<Column>) -> Result<Self, ValidationError> {
        for (i, column) in columns.iter().enumerate() {
            if column.is_derived() {
                return Err(ValidationError::InvalidParameter(format!(
                    "'{}' is not a BLAST output column",
                    column
                )));
            }
            if columns[..i].contains(column) {
                return Err(ValidationError::InvalidParameter(format!(
                    "column '{}' listed twice",
                    column
                )));
            }
        }
        if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !columns.contains(c)) {
            return Err(ValidationError::InvalidParameter(format!(
                "output layout lacks required column '{}'",
                missing
            )));
        }
        Ok(Self(columns))
    }

    /// The twelve `-outfmt 6` defaults
    pub fn standard() -> Self {
        Self(REQUIRED_COLUMNS.to_vec())
    }

    /// Standard columns plus lengths, identities, gaps and aligned sequences
    pub fn extended() -> Self {
        Self(Column::blast_columns())
    }

    /// Parse an `-outfmt` value such as `"6 qseqid sseqid ..."` or `"6 std qlen"`
    pub fn from_outfmt(outfmt: &str) -> Result<Self, ValidationError> {
        let mut tokens = outfmt.split_whitespace().peekable();
        if tokens.peek().is_some_and(|t| t.chars().all(|c| c.is_ascii_digit())) {
            tokens.next();
        }
        let mut columns = Vec::new();
        let mut any = false;
        for token in tokens {
            any = true;
            if token == "std" {
                columns.extend(REQUIRED_COLUMNS);
                continue;
            }
            let column = token
                .parse::<Column>()
                .map_err(ValidationError::InvalidParameter)?;
            columns.push(column);
        }
        if !any {
            return Ok(Self::standard());
        }
        Self::new(columns)
    }

    /// `-outfmt` argument reproducing this layout
    pub fn to_outfmt(&self) -> String {
        let mut fmt = String::from("6");
        for column in &self.0 {
            fmt.push(' ');
            fmt.push_str(column.key());
        }
        fmt
    }

    pub fn columns(&self) -> &[Column] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for OutputColumns {
    fn default() -> Self {
        Self::extended()
    }
}
