use super::open_registry;
use crate::cli::commands::load_config;
use crate::cli::output::*;
use blastui_bio::ContigPreparation;
use blastui_core::MoleculeType;
use blastui_tools::RegisterOptions;
use blastui_utils::{create_spinner, format_number};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Args)]
pub struct AddArgs {
    /// Database name (no spaces or path separators)
    pub name: String,

    /// FASTA files to index; each file is one genome
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Molecule type (detected from the first sequence when omitted)
    #[arg(short, long, value_enum)]
    pub molecule: Option<MoleculeType>,

    /// Title stored in the index
    #[arg(long)]
    pub title: Option<String>,

    /// Drop contigs shorter than this many residues
    #[arg(long)]
    pub min_length: Option<usize>,

    /// Keep original contig headers instead of `<genome>_NODE_<n>`
    #[arg(long)]
    pub keep_headers: bool,
}

pub fn run(args: AddArgs) -> anyhow::Result<()> {
    let _span = tracing::info_span!("database_add", name = %args.name).entered();

    let config = load_config()?;
    let registry = open_registry(&config);
    let options = RegisterOptions {
        preparation: ContigPreparation {
            rename_headers: config.database.rename_headers && !args.keep_headers,
            min_length: args.min_length.unwrap_or(config.database.min_contig_length),
        },
        title: args.title,
        timeout: (config.blast.timeout_secs > 0)
            .then(|| Duration::from_secs(config.blast.timeout_secs)),
    };

    let spinner = create_spinner(&format!(
        "Indexing {} file(s) as '{}'...",
        args.files.len(),
        args.name
    ));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = registry.register(&args.name, &args.files, args.molecule, &options);
    spinner.finish_and_clear();
    let database = result?;

    success(&format!("Created database '{}'", database.name));
    tree_item(false, "Type", Some(&database.molecule_type.to_string()));
    tree_item(
        false,
        "Sequences",
        Some(&format_number(database.sequence_count)),
    );
    tree_item(
        false,
        "Residues",
        Some(&format_number(database.total_residues)),
    );
    tree_item(true, "Location", Some(&database.path.display().to_string()));
    Ok(())
}
