use super::SelectionArgs;
use crate::cli::commands::read_results;
use crate::cli::output::*;
use blastui_results::{best_hits, columns::format_float, summarize, Column, ResultSet};
use clap::Args;
use comfy_table::{Cell, CellAlignment};
use std::path::PathBuf;

#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Columns to show, comma separated (e.g. `qseqid,sseqid,pident,strain`)
    #[arg(short, long, value_delimiter = ',')]
    pub columns: Vec<Column>,

    /// Rows to print
    #[arg(long)]
    pub limit: Option<usize>,

    /// One line per query instead of one per hit
    #[arg(long)]
    pub summary: bool,

    /// Print the selected hits as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct BestArgs {
    /// Results file written by `search --output`
    pub input: PathBuf,

    /// Save the best hits instead of printing them
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run_show(args: ShowArgs) -> anyhow::Result<()> {
    let results = args.selection.load()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if args.summary {
        print_summary(&results);
        return Ok(());
    }

    let columns = if args.columns.is_empty() {
        DEFAULT_TABLE_COLUMNS.to_vec()
    } else {
        args.columns
    };
    print_hits(&results, &columns, args.limit);
    Ok(())
}

fn print_summary(results: &ResultSet) {
    let mut table = create_standard_table();
    table.set_header(vec![
        header_cell("Query"),
        header_cell("Hits"),
        header_cell("Subjects"),
        header_cell("Best identity"),
        header_cell("Best e-value"),
        header_cell("Best bit score"),
    ]);

    let optional = |v: Option<f64>| v.map(format_float).unwrap_or_default();
    for summary in summarize(results) {
        table.add_row(vec![
            Cell::new(&summary.query_id),
            Cell::new(summary.hits).set_alignment(CellAlignment::Right),
            Cell::new(summary.subjects).set_alignment(CellAlignment::Right),
            Cell::new(optional(summary.best_identity)).set_alignment(CellAlignment::Right),
            Cell::new(optional(summary.best_evalue)).set_alignment(CellAlignment::Right),
            Cell::new(optional(summary.best_bit_score)).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{}", table);
}

pub fn run_best(args: BestArgs) -> anyhow::Result<()> {
    let results = read_results(&args.input)?;
    let best = best_hits(&results);

    match &args.output {
        Some(path) => {
            super::export::save(&best, path)?;
            success(&format!(
                "Saved {} best hits to {}",
                best.len(),
                path.display()
            ));
        }
        None => {
            section_header("Best hit per query");
            print_hits(&best, DEFAULT_TABLE_COLUMNS, None);
        }
    }
    Ok(())
}
