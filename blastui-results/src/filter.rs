//! Row filters and sort keys for result tables

use crate::columns::{Cell, Column};
use crate::hit::HitRecord;
use blastui_core::{BlastUiResult, ValidationError};
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;
use std::ops::Bound;
use std::str::FromStr;

/// Case-insensitive match against a text column
#[derive(Debug, Clone)]
pub enum TextMatch {
    /// Lowercased needle
    Contains(String),
    /// Lowercased value
    Exact(String),
    Regex(Regex),
}

impl TextMatch {
    pub fn contains(needle: &str) -> Self {
        TextMatch::Contains(needle.to_lowercase())
    }

    pub fn exact(value: &str) -> Self {
        TextMatch::Exact(value.to_lowercase())
    }

    pub fn regex(pattern: &str) -> BlastUiResult<Self> {
        let re = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| invalid(format!("invalid regex '{}': {}", pattern, e)))?;
        Ok(TextMatch::Regex(re))
    }

    pub fn is_match(&self, text: &str) -> bool {
        match self {
            TextMatch::Contains(needle) => text.to_lowercase().contains(needle.as_str()),
            TextMatch::Exact(value) => text.to_lowercase() == *value,
            TextMatch::Regex(re) => re.is_match(text),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Filter {
    /// Numeric range on a numeric column
    Range {
        column: Column,
        min: Bound<f64>,
        max: Bound<f64>,
    },
    /// String match on a text column
    Text { column: Column, pattern: TextMatch },
    /// Search every column: substring on text, near-equality on numbers
    Global(String),
}

impl Filter {
    pub fn range(column: Column, min: Bound<f64>, max: Bound<f64>) -> BlastUiResult<Self> {
        if !column.is_numeric() {
            return Err(invalid(format!("'{}' is not a numeric column", column)));
        }
        Ok(Filter::Range { column, min, max })
    }

    pub fn at_least(column: Column, min: f64) -> BlastUiResult<Self> {
        Self::range(column, Bound::Included(min), Bound::Unbounded)
    }

    pub fn at_most(column: Column, max: f64) -> BlastUiResult<Self> {
        Self::range(column, Bound::Unbounded, Bound::Included(max))
    }

    pub fn text(column: Column, pattern: TextMatch) -> BlastUiResult<Self> {
        if column.is_numeric() {
            return Err(invalid(format!("'{}' is not a text column", column)));
        }
        Ok(Filter::Text { column, pattern })
    }

    pub fn global(query: &str) -> Self {
        Filter::Global(query.trim().to_lowercase())
    }

    /// Parse a filter expression.
    ///
    /// Numeric columns: `pident>=90`, `evalue<1e-5`, `qcov=80..100`,
    /// `length=12`. Text columns: `sseqid~node` (contains), `genome=SRR1`
    /// (exact), `sseqid=~^gen.*_NODE_1$` (regex). Anything without an
    /// operator is a global search.
    pub fn parse(expr: &str) -> BlastUiResult<Self> {
        let Some(pos) = expr.find(['<', '>', '=', '~']) else {
            return Ok(Self::global(expr));
        };
        let rest = &expr[pos..];
        let op = [">=", "<=", "=~", ">", "<", "=", "~"]
            .into_iter()
            .find(|op| rest.starts_with(op))
            .unwrap_or("=");
        let column: Column = expr[..pos]
            .parse()
            .map_err(|e: String| invalid(format!("{} in filter '{}'", e, expr)))?;
        let value = rest[op.len()..].trim();
        if value.is_empty() {
            return Err(invalid(format!("filter '{}' has no value", expr)));
        }

        if column.is_numeric() {
            let number = |text: &str| -> BlastUiResult<f64> {
                text.trim()
                    .parse::<f64>()
                    .map_err(|_| invalid(format!("'{}' is not a number in filter '{}'", text, expr)))
            };
            let bound = |text: &str| -> BlastUiResult<Bound<f64>> {
                if text.trim().is_empty() {
                    Ok(Bound::Unbounded)
                } else {
                    number(text).map(Bound::Included)
                }
            };
            match op {
                ">=" => Self::range(column, Bound::Included(number(value)?), Bound::Unbounded),
                ">" => Self::range(column, Bound::Excluded(number(value)?), Bound::Unbounded),
                "<=" => Self::range(column, Bound::Unbounded, Bound::Included(number(value)?)),
                "<" => Self::range(column, Bound::Unbounded, Bound::Excluded(number(value)?)),
                "=" => match value.split_once("..") {
                    Some((lo, hi)) => Self::range(column, bound(lo)?, bound(hi)?),
                    None => {
                        let v = number(value)?;
                        Self::range(column, Bound::Included(v), Bound::Included(v))
                    }
                },
                _ => Err(invalid(format!(
                    "'{}' cannot be used on numeric column '{}'",
                    op, column
                ))),
            }
        } else {
            match op {
                "~" => Self::text(column, TextMatch::contains(value)),
                "=" => Self::text(column, TextMatch::exact(value)),
                "=~" => Self::text(column, TextMatch::regex(value)?),
                _ => Err(invalid(format!(
                    "'{}' cannot be used on text column '{}'",
                    op, column
                ))),
            }
        }
    }

    pub fn matches(&self, hit: &HitRecord) -> bool {
        match self {
            Filter::Range { column, min, max } => match column.value(hit).as_f64() {
                Some(v) => in_bounds(v, *min, *max),
                None => false,
            },
            Filter::Text { column, pattern } => match column.value(hit) {
                Cell::Text(text) => pattern.is_match(text),
                _ => false,
            },
            Filter::Global(query) => global_match(query, hit),
        }
    }
}

impl FromStr for Filter {
    type Err = blastui_core::BlastUiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Filter::parse(s)
    }
}

fn in_bounds(v: f64, min: Bound<f64>, max: Bound<f64>) -> bool {
    let above = match min {
        Bound::Included(m) => v >= m,
        Bound::Excluded(m) => v > m,
        Bound::Unbounded => true,
    };
    let below = match max {
        Bound::Included(m) => v <= m,
        Bound::Excluded(m) => v < m,
        Bound::Unbounded => true,
    };
    above && below
}

fn global_match(query: &str, hit: &HitRecord) -> bool {
    if query.is_empty() {
        return true;
    }
    let number = query.parse::<f64>().ok();
    Column::all().iter().any(|column| match column.value(hit) {
        Cell::Text(text) => text.to_lowercase().contains(query),
        Cell::Missing => false,
        cell => match (number, cell.as_f64()) {
            (Some(n), Some(v)) => (n - v).abs() <= 1e-8 + 1e-5 * v.abs(),
            _ => false,
        },
    })
}

fn invalid(message: String) -> blastui_core::BlastUiError {
    ValidationError::InvalidParameter(message).into()
}

/// Filters combined with AND
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_all<S: AsRef<str>>(exprs: &[S]) -> BlastUiResult<Self> {
        let filters = exprs
            .iter()
            .map(|e| Filter::parse(e.as_ref()))
            .collect::<BlastUiResult<Vec<_>>>()?;
        Ok(Self { filters })
    }

    pub fn with(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn push(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn matches(&self, hit: &HitRecord) -> bool {
        self.filters.iter().all(|f| f.matches(hit))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: Column,
    pub descending: bool,
}

impl SortKey {
    pub fn asc(column: Column) -> Self {
        Self {
            column,
            descending: false,
        }
    }

    pub fn desc(column: Column) -> Self {
        Self {
            column,
            descending: true,
        }
    }
}

impl FromStr for SortKey {
    type Err = blastui_core::BlastUiError;

    /// `pident`, `pident:desc`, `evalue:asc` or `-bitscore`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, descending) = if let Some(name) = s.strip_prefix('-') {
            (name, true)
        } else {
            match s.rsplit_once(':') {
                Some((name, "desc")) => (name, true),
                Some((name, "asc")) => (name, false),
                Some((_, other)) => {
                    return Err(invalid(format!("unknown sort direction '{}'", other)))
                }
                None => (s, false),
            }
        };
        let column = name.parse::<Column>().map_err(invalid)?;
        Ok(Self { column, descending })
    }
}

/// Identity descending, then query coverage descending
pub fn default_sort() -> Vec<SortKey> {
    vec![
        SortKey::desc(Column::PercentIdentity),
        SortKey::desc(Column::QueryCoverage),
    ]
}

pub fn compare_hits(a: &HitRecord, b: &HitRecord, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let (x, y) = (key.column.value(a), key.column.value(b));
        let ord = match (x.is_missing(), y.is_missing()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) if key.descending => y.compare(&x),
            (false, false) => x.compare(&y),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Stable in-place sort
pub fn sort_hits(hits: &mut [HitRecord], keys: &[SortKey]) {
    hits.sort_by(|a, b| compare_hits(a, b, keys));
}
