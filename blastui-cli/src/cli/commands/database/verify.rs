use super::open_registry;
use crate::cli::commands::load_config;
use crate::cli::output::*;
use blastui_core::{BlastUiError, ValidationError};
use clap::Args;
use colored::*;

#[derive(Args)]
pub struct VerifyArgs {
    /// Database to check (all when omitted)
    pub name: Option<String>,
}

pub fn run(args: VerifyArgs) -> anyhow::Result<()> {
    let config = load_config()?;
    let registry = open_registry(&config);
    let databases = match &args.name {
        Some(name) => vec![registry.get(name)?],
        None => registry.list()?,
    };

    if databases.is_empty() {
        empty("No databases to verify");
        return Ok(());
    }

    let mut broken = Vec::new();
    for (i, db) in databases.iter().enumerate() {
        let is_last = i + 1 == databases.len();
        if db.is_indexed() {
            tree_item(is_last, &db.name, Some(&"ok".green().to_string()));
            continue;
        }

        let missing: Vec<String> = db
            .index_files()
            .iter()
            .filter(|p| !p.is_file())
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        let detail = format!("missing {}", missing.join(", "));
        tree_item(is_last, &db.name, Some(&detail.red().to_string()));
        broken.push(db.name.clone());
    }

    if broken.is_empty() {
        success("All databases are indexed");
        return Ok(());
    }
    Err(BlastUiError::from(ValidationError::DatabaseNotIndexed(broken.join(", "))).into())
}
