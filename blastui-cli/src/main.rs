use clap::Parser;
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

mod cli;

use crate::cli::{Cli, Commands};
use blastui_core::BlastUiError;

fn main() {
    let cli = Cli::parse();

    // BLASTUI_LOG wins over -v
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("BLASTUI_LOG")
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("Paths:\n{}", blastui_core::describe_paths());

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(exit_code(&e));
    }
}

fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<BlastUiError>() {
        Some(BlastUiError::Validation(_)) => 2,
        Some(BlastUiError::Subprocess(_)) => 3,
        Some(BlastUiError::Parse(_)) => 4,
        Some(BlastUiError::Export(_)) => 5,
        Some(BlastUiError::Configuration(_)) => 6,
        Some(BlastUiError::Database(_)) | Some(BlastUiError::NotFound(_)) => 7,
        Some(BlastUiError::Cancelled) => 130,
        _ => 1,
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.verbose > 0 && cli.threads > 0 {
        eprintln!("Using {} BLAST threads", cli.threads);
    }

    match cli.command {
        Commands::Database(args) => crate::cli::commands::database::run(args),
        Commands::Search(args) => crate::cli::commands::search::run(args, cli.threads),
        Commands::Results(args) => crate::cli::commands::results::run(args),
        Commands::Tools(args) => crate::cli::commands::tools::run(args),
    }
}
