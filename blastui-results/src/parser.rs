//! Lazy parser for BLAST tabular (`-outfmt 6`) output

use crate::columns::OutputColumns;
use crate::hit::HitRecord;
use crate::result_set::ResultSet;
use blastui_core::ParseError;
use std::io::BufRead;

/// Iterator over the hits of a tabular payload.
///
/// Blank lines and `#` comment lines are skipped. Every other line must have
/// exactly one field per column of the layout.
pub struct TabularParser<R> {
    reader: R,
    columns: OutputColumns,
    line: usize,
    buf: String,
    done: bool,
}

impl<R: BufRead> TabularParser<R> {
    pub fn new(reader: R, columns: OutputColumns) -> Self {
        Self {
            reader,
            columns,
            line: 0,
            buf: String::new(),
            done: false,
        }
    }

    /// 1-based number of the last line read
    pub fn line(&self) -> usize {
        self.line
    }

    fn parse_line(&self, text: &str) -> Result<HitRecord, ParseError> {
        let fields: Vec<&str> = text.split('\t').collect();
        if fields.len() != self.columns.len() {
            return Err(ParseError::new(
                self.line,
                format!(
                    "expected {} columns, found {}",
                    self.columns.len(),
                    fields.len()
                ),
            ));
        }

        let mut hit = HitRecord::default();
        for (column, field) in self.columns.columns().iter().zip(&fields) {
            column
                .assign(&mut hit, field)
                .map_err(|message| ParseError::new(self.line, message))?;
        }
        hit.check()
            .map_err(|message| ParseError::new(self.line, message))?;
        Ok(hit)
    }
}

impl<R: BufRead> Iterator for TabularParser<R> {
    type Item = Result<HitRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => {
                    self.done = true;
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    self.done = true;
                    return Some(Err(ParseError::new(
                        self.line + 1,
                        format!("failed to read output: {}", e),
                    )));
                }
            }
            self.line += 1;

            let text = self.buf.trim_end_matches(['\n', '\r']);
            if text.trim().is_empty() || text.starts_with('#') {
                continue;
            }
            return Some(self.parse_line(text));
        }
    }
}

/// Parse a whole payload into a ResultSet.
///
/// `query_ids` is the submission order; queries without hits stay listed so
/// they can be reported as such.
pub fn parse_result_set<R: BufRead>(
    reader: R,
    columns: &OutputColumns,
    query_ids: Vec<String>,
) -> Result<ResultSet, ParseError> {
    let hits = TabularParser::new(reader, columns.clone()).collect::<Result<Vec<_>, _>>()?;
    tracing::debug!("Parsed {} hits for {} queries", hits.len(), query_ids.len());
    Ok(ResultSet::with_queries(query_ids, hits))
}
