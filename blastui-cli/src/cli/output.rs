/// Standard output utilities for consistent command formatting
use blastui_results::{Column, ResultSet};
use colored::*;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color as TableColor, ContentArrangement, Table};

/// Columns shown when none are requested
pub const DEFAULT_TABLE_COLUMNS: &[Column] = &[
    Column::QueryId,
    Column::SubjectId,
    Column::PercentIdentity,
    Column::AlignmentLength,
    Column::QueryCoverage,
    Column::Evalue,
    Column::BitScore,
    Column::Strand,
];

pub fn section_header(title: &str) {
    println!("\n{}", title.bold().cyan());
}

/// Display a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Display an info message
pub fn info(message: &str) {
    println!("{} {}", "●".blue(), message);
}

/// Display a warning message
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Display an empty/none indicator
pub fn empty(message: &str) {
    println!("{} {}", "◌".dimmed(), message);
}

/// Tree structure item
pub fn tree_item(is_last: bool, label: &str, value: Option<&str>) {
    let prefix = if is_last { "└─" } else { "├─" };
    if let Some(val) = value {
        println!("{} {}: {}", prefix.dimmed(), label, val);
    } else {
        println!("{} {}", prefix.dimmed(), label);
    }
}

/// Create a standard table with our preferred styling
pub fn create_standard_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Create a standard header cell
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .add_attribute(Attribute::Bold)
        .fg(TableColor::Cyan)
}

pub fn format_size(bytes: u64) -> String {
    use humansize::{format_size as hs_format, BINARY};
    hs_format(bytes, BINARY)
}

/// Hits as a table, first column the 1-based row number used by `--rows`.
///
/// At most `limit` rows are rendered; `None` renders all of them.
pub fn hits_table(results: &ResultSet, columns: &[Column], limit: Option<usize>) -> Table {
    let mut table = create_standard_table();
    let mut header = vec![header_cell("#")];
    header.extend(columns.iter().map(|c| header_cell(c.header())));
    table.set_header(header);

    let shown = limit.unwrap_or(results.len());
    for (i, hit) in results.iter().take(shown).enumerate() {
        let mut row = vec![Cell::new(i + 1).fg(TableColor::DarkGrey)];
        for column in columns {
            let cell = Cell::new(column.value(hit).to_string());
            row.push(if column.is_numeric() {
                cell.set_alignment(CellAlignment::Right)
            } else {
                cell
            });
        }
        table.add_row(row);
    }
    table
}

/// Print a hits table followed by a count line
pub fn print_hits(results: &ResultSet, columns: &[Column], limit: Option<usize>) {
    if results.is_empty() {
        empty("No hits");
        return;
    }
    println!("{}", hits_table(results, columns, limit));
    match limit {
        Some(n) if n < results.len() => info(&format!(
            "Showing {} of {} hits (use --limit to see more)",
            n,
            results.len()
        )),
        _ => info(&format!("{} hits", results.len())),
    }
}
