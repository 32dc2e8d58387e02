use super::open_registry;
use crate::cli::commands::load_config;
use crate::cli::output::*;
use blastui_utils::format_number;
use clap::Args;
use comfy_table::{Cell, Color};

#[derive(Args)]
pub struct ListArgs {
    /// Print the database metadata as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ListArgs) -> anyhow::Result<()> {
    let _span = tracing::info_span!("database_list").entered();

    let config = load_config()?;
    let registry = open_registry(&config);
    let databases = registry.list()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&databases)?);
        return Ok(());
    }

    section_header("Databases");
    if databases.is_empty() {
        empty(&format!("No databases in {}", registry.root().display()));
        info("Add one with: blastui database add <name> <genome.fasta>...");
        return Ok(());
    }

    let mut table = create_standard_table();
    table.set_header(vec![
        header_cell("Name"),
        header_cell("Type"),
        header_cell("Sequences"),
        header_cell("Residues"),
        header_cell("Size"),
        header_cell("Created"),
        header_cell("Status"),
    ]);

    for db in &databases {
        let status = if db.is_indexed() {
            Cell::new("indexed").fg(Color::Green)
        } else {
            Cell::new("missing index").fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(&db.name),
            Cell::new(db.molecule_type.to_string()),
            Cell::new(format_number(db.sequence_count)),
            Cell::new(format_number(db.total_residues)),
            Cell::new(format_size(db.size)),
            Cell::new(db.created_at.format("%Y-%m-%d %H:%M").to_string()),
            status,
        ]);
    }

    println!("{}", table);
    Ok(())
}
