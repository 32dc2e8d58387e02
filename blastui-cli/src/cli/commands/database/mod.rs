pub mod add;
pub mod delete;
pub mod list;
pub mod verify;

use blastui_core::Config;
use blastui_session::SessionPaths;
use blastui_tools::{DatabaseRegistry, ToolLocator};
use clap::{Args, Subcommand};
use std::path::Path;

#[derive(Args)]
pub struct DatabaseArgs {
    #[command(subcommand)]
    pub command: DatabaseCommands,
}

#[derive(Subcommand)]
pub enum DatabaseCommands {
    /// List registered databases
    List(list::ListArgs),

    /// Build a database from one or more FASTA files (one genome per file)
    Add(add::AddArgs),

    /// Delete a database and its index files
    Delete(delete::DeleteArgs),

    /// Check that databases are indexed and usable for searches
    Verify(verify::VerifyArgs),
}

pub fn run(args: DatabaseArgs) -> anyhow::Result<()> {
    match args.command {
        DatabaseCommands::List(args) => list::run(args),
        DatabaseCommands::Add(args) => add::run(args),
        DatabaseCommands::Delete(args) => delete::run(args),
        DatabaseCommands::Verify(args) => verify::run(args),
    }
}

/// Registry at the configured databases directory
pub fn open_registry(config: &Config) -> DatabaseRegistry {
    let paths = SessionPaths::from_config(config);
    let executables_dir = config.blast.executables_dir.as_deref().map(Path::new);
    DatabaseRegistry::new(
        paths.databases_dir,
        ToolLocator::new(&paths.tools_dir, executables_dir),
    )
}
