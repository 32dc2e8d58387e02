pub mod install;
pub mod list;

use blastui_core::{blastui_tools_dir, Config};
use blastui_tools::ToolLocator;
use clap::{Args, Subcommand};
use std::path::Path;

#[derive(Args)]
pub struct ToolsArgs {
    #[command(subcommand)]
    pub command: ToolsCommands,
}

#[derive(Subcommand)]
pub enum ToolsCommands {
    /// Show where each BLAST+ executable is found and which versions are installed
    List(list::ListArgs),

    /// Download and install BLAST+ from NCBI
    Install(install::InstallArgs),

    /// Switch the managed installation to an installed version
    Use(install::UseArgs),
}

pub fn run(args: ToolsArgs) -> anyhow::Result<()> {
    match args.command {
        ToolsCommands::List(args) => list::run(args),
        ToolsCommands::Install(args) => install::run(args),
        ToolsCommands::Use(args) => install::run_use(args),
    }
}

pub fn locator(config: &Config) -> ToolLocator {
    let executables_dir = config.blast.executables_dir.as_deref().map(Path::new);
    ToolLocator::new(&blastui_tools_dir(), executables_dir)
}
