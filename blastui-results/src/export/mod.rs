//! Writing result tables and sequences to files, and reading tables back

pub mod delimited;
pub mod fasta;
pub mod xlsx;

pub use delimited::{read_delimited, write_delimited, write_delimited_to};
pub use fasta::{hit_sequences, write_hit_fasta, SequenceSource};
pub use xlsx::{read_xlsx, write_xlsx};

use crate::alignment::{format_alignments, DEFAULT_ALIGNMENT_WIDTH};
use crate::columns::Column;
use crate::hit::HitRecord;
use crate::result_set::ResultSet;
use blastui_core::{BlastUiResult, ExportError};
use std::fmt;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
    Xlsx,
    Fasta,
    /// Pairwise alignment text
    Text,
    Json,
}

impl ExportFormat {
    pub fn all() -> &'static [ExportFormat] {
        &[
            ExportFormat::Csv,
            ExportFormat::Tsv,
            ExportFormat::Xlsx,
            ExportFormat::Fasta,
            ExportFormat::Text,
            ExportFormat::Json,
        ]
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Fasta => "fasta",
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
        }
    }

    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "fa" | "fas" | "fna" | "faa" => Some(ExportFormat::Fasta),
            "tab" => Some(ExportFormat::Tsv),
            other => other.parse().ok(),
        }
    }

    /// Formats that can be read back into a ResultSet
    pub fn is_importable(&self) -> bool {
        matches!(
            self,
            ExportFormat::Csv | ExportFormat::Tsv | ExportFormat::Xlsx | ExportFormat::Json
        )
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            "fasta" => Ok(ExportFormat::Fasta),
            "txt" | "text" | "alignments" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Table columns, in output order
    pub columns: Vec<Column>,
    pub line_width: usize,
    pub sequence_source: SequenceSource,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            columns: Column::blast_columns(),
            line_width: DEFAULT_ALIGNMENT_WIDTH,
            sequence_source: SequenceSource::Subject,
        }
    }
}

/// Write through a temp file in the destination directory, renamed into
/// place once complete. Readers never see a partial file.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<(), ExportError>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let io_err = |source: io::Error| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write(&mut writer).map_err(io_err)?;
        writer.flush().map_err(io_err)?;
    }
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    tracing::debug!("Wrote {}", path.display());
    Ok(())
}

/// Export in any supported format
pub fn export_results(
    results: &ResultSet,
    path: &Path,
    format: ExportFormat,
    options: &ExportOptions,
) -> BlastUiResult<()> {
    match format {
        ExportFormat::Csv => write_delimited(results, path, b',', &options.columns)?,
        ExportFormat::Tsv => write_delimited(results, path, b'\t', &options.columns)?,
        ExportFormat::Xlsx => write_xlsx(results, path, &options.columns)?,
        ExportFormat::Fasta => {
            write_hit_fasta(results, path, options.sequence_source, options.line_width)?
        }
        ExportFormat::Text => {
            if results.is_empty() {
                return Err(ExportError::Empty.into());
            }
            let text = format_alignments(results, options.line_width)?;
            write_atomic(path, |w| w.write_all(text.as_bytes()))?;
        }
        ExportFormat::Json => results.save_json(path)?,
    }
    tracing::info!(
        "Exported {} hits as {} to {}",
        results.len(),
        format,
        path.display()
    );
    Ok(())
}

/// Read back a table written by [`export_results`]
pub fn import_results(path: &Path, format: ExportFormat) -> BlastUiResult<ResultSet> {
    match format {
        ExportFormat::Csv => read_delimited(path, b','),
        ExportFormat::Tsv => read_delimited(path, b'\t'),
        ExportFormat::Xlsx => read_xlsx(path),
        ExportFormat::Json => ResultSet::load_json(path),
        ExportFormat::Fasta | ExportFormat::Text => {
            Err(ExportError::UnsupportedFormat(format!("cannot import {}", format)).into())
        }
    }
}

/// Map a table header row onto columns. Derived and unknown headings are
/// skipped; every required column must be present.
pub(crate) fn header_columns<S: AsRef<str>>(
    headers: &[S],
) -> Result<Vec<Option<Column>>, ExportError> {
    let columns: Vec<Option<Column>> = headers
        .iter()
        .map(|h| h.as_ref().parse::<Column>().ok().filter(|c| !c.is_derived()))
        .collect();
    for required in crate::columns::REQUIRED_COLUMNS {
        if !columns.contains(&Some(required)) {
            return Err(ExportError::Encode {
                format: "table".to_string(),
                message: format!("missing required column '{}'", required),
            });
        }
    }
    Ok(columns)
}

/// Build one hit from a table row; `row` is 1-based including the header
pub(crate) fn hit_from_row<S: AsRef<str>>(
    columns: &[Option<Column>],
    fields: &[S],
    row: usize,
) -> BlastUiResult<HitRecord> {
    let mut hit = HitRecord::default();
    for (column, field) in columns.iter().zip(fields) {
        if let Some(column) = column {
            column
                .assign(&mut hit, field.as_ref())
                .map_err(|message| blastui_core::ParseError::new(row, message))?;
        }
    }
    hit.check()
        .map_err(|message| blastui_core::ParseError::new(row, message))?;
    Ok(hit)
}
