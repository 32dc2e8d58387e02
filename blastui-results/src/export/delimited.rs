//! CSV and TSV tables

use super::{header_columns, hit_from_row, write_atomic};
use crate::columns::Column;
use crate::result_set::ResultSet;
use blastui_core::{BlastUiResult, ExportError};
use std::io::{self, Write};
use std::path::Path;

fn format_name(delimiter: u8) -> &'static str {
    if delimiter == b'\t' {
        "tsv"
    } else {
        "csv"
    }
}

/// Header row of column keys, then one row per hit. Missing optional values
/// are empty fields.
pub fn write_delimited_to<W: Write>(
    results: &ResultSet,
    writer: W,
    delimiter: u8,
    columns: &[Column],
) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);
    wtr.write_record(columns.iter().map(|c| c.key()))?;
    for hit in results {
        wtr.write_record(columns.iter().map(|c| c.value(hit).to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_delimited(
    results: &ResultSet,
    path: &Path,
    delimiter: u8,
    columns: &[Column],
) -> BlastUiResult<()> {
    write_atomic(path, |w| {
        write_delimited_to(results, w, delimiter, columns).map_err(io::Error::from)
    })?;
    Ok(())
}

pub fn read_delimited(path: &Path, delimiter: u8) -> BlastUiResult<ResultSet> {
    let encode_err = |e: csv::Error| ExportError::Encode {
        format: format_name(delimiter).to_string(),
        message: e.to_string(),
    };
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(false)
        .from_path(path)
        .map_err(encode_err)?;

    let headers: Vec<String> = rdr
        .headers()
        .map_err(encode_err)?
        .iter()
        .map(str::to_string)
        .collect();
    let columns = header_columns(&headers)?;

    let mut hits = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record.map_err(encode_err)?;
        let fields: Vec<&str> = record.iter().collect();
        hits.push(hit_from_row(&columns, &fields, i + 2)?);
    }
    tracing::debug!("Read {} hits from {}", hits.len(), path.display());
    Ok(ResultSet::new(hits))
}
