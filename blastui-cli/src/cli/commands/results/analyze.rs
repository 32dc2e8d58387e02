use super::SelectionArgs;
use crate::cli::output::*;
use blastui_results::{AnalysisOutput, AnalysisRegistry};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Analysis to run (see `blastui results analyses`)
    pub analysis: String,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Save the hits an analysis selects (format from the extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run_list() -> anyhow::Result<()> {
    let registry = AnalysisRegistry::new();
    section_header("Analyses");
    let analyses: Vec<_> = registry.list().collect();
    for (i, analysis) in analyses.iter().enumerate() {
        tree_item(
            i + 1 == analyses.len(),
            analysis.name(),
            Some(analysis.description()),
        );
    }
    Ok(())
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let _span = tracing::info_span!("analyze", analysis = %args.analysis).entered();
    let registry = AnalysisRegistry::new();
    let results = args.selection.load()?;

    match registry.run(&args.analysis, &results)? {
        AnalysisOutput::Report(text) => match &args.output {
            Some(path) => {
                std::fs::write(path, &text)?;
                success(&format!("Wrote report to {}", path.display()));
            }
            None => print!("{}", text),
        },
        AnalysisOutput::Results(found) => {
            section_header(&format!(
                "{}: {} of {} hits",
                args.analysis,
                found.len(),
                results.len()
            ));
            print_hits(&found, DEFAULT_TABLE_COLUMNS, None);
            if let Some(path) = &args.output {
                super::export::save(&found, path)?;
                success(&format!("Saved {} hits to {}", found.len(), path.display()));
            }
        }
    }
    Ok(())
}
