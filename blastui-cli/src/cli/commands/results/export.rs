use super::SelectionArgs;
use crate::cli::commands::load_config;
use crate::cli::output::*;
use blastui_core::BlastUiError;
use blastui_results::{
    export_results, format_alignments, write_coverage_chart, ChartOptions, Column, ExportFormat,
    ExportOptions, ResultSet, SequenceSource,
};
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct FilterArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Where to save the matching hits (format from the extension)
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Destination file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Output format (from the extension, then `[export] default_format`)
    #[arg(short, long)]
    pub format: Option<ExportFormat>,

    /// Table columns, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub columns: Vec<Column>,

    /// Sequence written to FASTA: the aligned subject or query
    #[arg(long, default_value = "subject")]
    pub source: SequenceSource,

    /// Residues per line in FASTA and alignment text
    #[arg(long)]
    pub line_width: Option<usize>,
}

#[derive(Args)]
pub struct ChartArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// SVG file to write
    #[arg(short, long)]
    pub output: PathBuf,

    #[arg(long, default_value = "1000")]
    pub width: u32,

    /// Hits drawn per query
    #[arg(long, default_value = "40")]
    pub max_hits: usize,
}

#[derive(Args)]
pub struct AlignmentsArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Residues per line
    #[arg(long)]
    pub width: Option<usize>,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Save under the format implied by the extension, JSON when there is none
pub fn save(results: &ResultSet, path: &Path) -> anyhow::Result<()> {
    let format = ExportFormat::from_path(path).unwrap_or(ExportFormat::Json);
    export_results(results, path, format, &ExportOptions::default())?;
    Ok(())
}

pub fn run_filter(args: FilterArgs) -> anyhow::Result<()> {
    let results = args.selection.load()?;
    save(&results, &args.output)?;
    success(&format!(
        "Saved {} matching hits to {}",
        results.len(),
        args.output.display()
    ));
    Ok(())
}

pub fn run_export(args: ExportArgs) -> anyhow::Result<()> {
    let _span = tracing::info_span!("export").entered();

    let config = load_config()?;
    let format = match args.format {
        Some(format) => format,
        None => match ExportFormat::from_path(&args.output) {
            Some(format) => format,
            None => config
                .export
                .default_format
                .parse::<ExportFormat>()
                .map_err(BlastUiError::from)?,
        },
    };
    let results = args.selection.load()?;

    let mut options = ExportOptions {
        line_width: args.line_width.unwrap_or(config.export.fasta_line_width),
        sequence_source: args.source,
        ..ExportOptions::default()
    };
    if !args.columns.is_empty() {
        options.columns = args.columns;
    }

    export_results(&results, &args.output, format, &options)?;
    success(&format!(
        "Exported {} hits as {} to {}",
        results.len(),
        format,
        args.output.display()
    ));
    Ok(())
}

pub fn run_chart(args: ChartArgs) -> anyhow::Result<()> {
    let results = args.selection.load()?;
    let options = ChartOptions {
        width: args.width,
        max_hits_per_query: args.max_hits,
        ..ChartOptions::default()
    };
    write_coverage_chart(&results, &args.output, &options)?;
    success(&format!("Wrote chart to {}", args.output.display()));
    Ok(())
}

pub fn run_alignments(args: AlignmentsArgs) -> anyhow::Result<()> {
    let config = load_config()?;
    let width = args.width.unwrap_or(config.export.fasta_line_width);
    let results = args.selection.load()?;

    match &args.output {
        Some(path) => {
            let options = ExportOptions {
                line_width: width,
                ..ExportOptions::default()
            };
            export_results(&results, path, ExportFormat::Text, &options)?;
            success(&format!(
                "Wrote {} alignments to {}",
                results.len(),
                path.display()
            ));
        }
        None if results.is_empty() => empty("No hits selected"),
        None => print!(
            "{}",
            format_alignments(&results, width).map_err(BlastUiError::from)?
        ),
    }
    Ok(())
}
