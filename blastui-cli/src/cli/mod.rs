pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "blastui",
    version,
    about = "Local BLAST searches over your own genome databases",
    long_about = "BlastUI registers FASTA files as BLAST databases, runs blastn/blastp/blastx/\
                  tblastn/tblastx searches against them, and lets you filter, chart and export \
                  the hits."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Threads handed to BLAST (0 = value from config)
    #[arg(short = 'j', long, default_value = "0", global = true)]
    pub threads: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage local BLAST databases
    Database(commands::database::DatabaseArgs),

    /// Run a BLAST search against a registered database
    Search(commands::search::SearchArgs),

    /// Inspect, filter and export saved search results
    Results(commands::results::ResultsArgs),

    /// Manage BLAST+ executables
    Tools(commands::tools::ToolsArgs),
}
