use super::open_registry;
use crate::cli::commands::load_config;
use crate::cli::output::*;
use clap::Args;

#[derive(Args)]
pub struct DeleteArgs {
    /// Database name
    pub name: String,
}

pub fn run(args: DeleteArgs) -> anyhow::Result<()> {
    let config = load_config()?;
    let database = open_registry(&config).delete(&args.name)?;
    success(&format!(
        "Deleted database '{}' ({})",
        database.name,
        format_size(database.size)
    ));
    Ok(())
}
