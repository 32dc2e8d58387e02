pub mod analyze;
pub mod export;
pub mod show;

use blastui_core::{BlastUiError, ValidationError};
use blastui_results::{Filter, FilterSet, ResultSet, SortKey};
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args)]
pub struct ResultsArgs {
    #[command(subcommand)]
    pub command: ResultsCommands,
}

#[derive(Subcommand)]
pub enum ResultsCommands {
    /// Print hits as a table
    Show(show::ShowArgs),

    /// Save the hits matching filters to a new file
    Filter(export::FilterArgs),

    /// Best hit of every query (highest bit score, then lowest e-value)
    Best(show::BestArgs),

    /// Export hits as CSV, TSV, XLSX, FASTA, alignment text or JSON
    Export(export::ExportArgs),

    /// Draw query coverage as an SVG chart
    Chart(export::ChartArgs),

    /// Show pairwise alignments of selected hits
    Alignments(export::AlignmentsArgs),

    /// Run an analysis over the hits
    Analyze(analyze::AnalyzeArgs),

    /// List the available analyses
    Analyses,
}

pub fn run(args: ResultsArgs) -> anyhow::Result<()> {
    match args.command {
        ResultsCommands::Show(args) => show::run_show(args),
        ResultsCommands::Filter(args) => export::run_filter(args),
        ResultsCommands::Best(args) => show::run_best(args),
        ResultsCommands::Export(args) => export::run_export(args),
        ResultsCommands::Chart(args) => export::run_chart(args),
        ResultsCommands::Alignments(args) => export::run_alignments(args),
        ResultsCommands::Analyze(args) => analyze::run(args),
        ResultsCommands::Analyses => analyze::run_list(),
    }
}

/// Saved results plus the filters, ordering and row picks applied to them
#[derive(Args)]
pub struct SelectionArgs {
    /// Results file written by `search --output` (JSON, CSV, TSV or XLSX)
    pub input: PathBuf,

    /// Column filter such as `pident>=90`, `evalue<1e-5`, `qcov=50..100` or
    /// `sseqid~NODE_1` (repeatable, all must match)
    #[arg(short = 'w', long = "where", value_name = "EXPR")]
    pub filters: Vec<String>,

    /// Free-text search across every column
    #[arg(long)]
    pub search: Option<String>,

    /// Sort key such as `bitscore:desc` or `-pident` (repeatable)
    #[arg(long, value_name = "KEY", allow_hyphen_values = true)]
    pub sort: Vec<SortKey>,

    /// Keep only these rows, numbered as in `results show` (e.g. `1,3,4`)
    #[arg(long, value_delimiter = ',')]
    pub rows: Vec<usize>,
}

impl SelectionArgs {
    pub fn load(&self) -> anyhow::Result<ResultSet> {
        let results = super::read_results(&self.input)?;
        tracing::debug!("Loaded {} hits from {}", results.len(), self.input.display());
        self.apply(&results)
    }

    /// Filter, then sort, then pick rows
    pub fn apply(&self, results: &ResultSet) -> anyhow::Result<ResultSet> {
        let mut filters = FilterSet::parse_all(&self.filters)?;
        if let Some(text) = &self.search {
            filters.push(Filter::global(text));
        }

        let mut selected = results.filtered(&filters);
        if !self.sort.is_empty() {
            selected = selected.sorted(&self.sort);
        }
        if !self.rows.is_empty() {
            if self.rows.contains(&0) {
                return Err(BlastUiError::from(ValidationError::InvalidParameter(
                    "rows are numbered from 1".to_string(),
                ))
                .into());
            }
            let rows: Vec<usize> = self.rows.iter().map(|r| r - 1).collect();
            selected = selected.select(&rows)?;
        }
        Ok(selected)
    }
}
