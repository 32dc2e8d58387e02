//! Excel workbooks: written with rust_xlsxwriter, read back with calamine

use super::{header_columns, hit_from_row, write_atomic};
use crate::columns::{Cell, Column};
use crate::result_set::ResultSet;
use blastui_core::{BlastUiResult, ExportError};
use calamine::{open_workbook_auto, DataType, Reader};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::io::Write;
use std::path::Path;

const SHEET_NAME: &str = "BLAST hits";

fn xlsx_error(err: impl std::fmt::Display) -> ExportError {
    ExportError::Encode {
        format: "xlsx".to_string(),
        message: err.to_string(),
    }
}

/// Workbook bytes: one header row, numeric columns as numbers
pub fn xlsx_bytes(results: &ResultSet, columns: &[Column]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (c, column) in columns.iter().enumerate() {
        sheet.write_string_with_format(0, c as u16, column.key(), &header)?;
    }
    for (r, hit) in results.iter().enumerate() {
        let row = r as u32 + 1;
        for (c, column) in columns.iter().enumerate() {
            let col = c as u16;
            match column.value(hit) {
                Cell::Text(text) => {
                    sheet.write_string(row, col, text)?;
                }
                Cell::Int(v) => {
                    sheet.write_number(row, col, f64::from(v))?;
                }
                Cell::Float(v) => {
                    sheet.write_number(row, col, v)?;
                }
                Cell::Missing => {}
            }
        }
    }
    sheet.set_freeze_panes(1, 0)?;
    sheet.autofit();

    workbook.save_to_buffer()
}

pub fn write_xlsx(results: &ResultSet, path: &Path, columns: &[Column]) -> BlastUiResult<()> {
    let bytes = xlsx_bytes(results, columns).map_err(xlsx_error)?;
    write_atomic(path, |w| w.write_all(&bytes))?;
    Ok(())
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Float(f) => f.to_string(),
        DataType::Int(i) => i.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::Empty => String::new(),
        other => format!("{:?}", other),
    }
}

/// Read the first worksheet back into a ResultSet
pub fn read_xlsx(path: &Path) -> BlastUiResult<ResultSet> {
    let mut workbook = open_workbook_auto(path).map_err(xlsx_error)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| xlsx_error("workbook has no worksheet"))?
        .map_err(xlsx_error)?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| xlsx_error("worksheet is empty"))?
        .iter()
        .map(cell_to_string)
        .collect();
    let columns = header_columns(&headers)?;

    let mut hits = Vec::new();
    for (i, row) in rows.enumerate() {
        let fields: Vec<String> = row.iter().map(cell_to_string).collect();
        if fields.iter().all(|f| f.is_empty()) {
            continue;
        }
        hits.push(hit_from_row(&columns, &fields, i + 2)?);
    }
    tracing::debug!("Read {} hits from {}", hits.len(), path.display());
    Ok(ResultSet::new(hits))
}
