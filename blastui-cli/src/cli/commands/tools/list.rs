use super::locator;
use crate::cli::commands::load_config;
use crate::cli::output::*;
use blastui_core::blastui_tools_dir;
use blastui_tools::ToolManager;
use clap::Args;
use comfy_table::{Cell, Color};

#[derive(Args)]
pub struct ListArgs {
    /// Also show every managed version, not just where tools resolve
    #[arg(long)]
    pub all_versions: bool,
}

pub fn run(args: ListArgs) -> anyhow::Result<()> {
    let config = load_config()?;
    let locator = locator(&config);

    section_header("BLAST+ executables");
    let mut table = create_standard_table();
    table.set_header(vec![header_cell("Tool"), header_cell("Status"), header_cell("Path")]);

    let survey = locator.survey();
    for (tool, path) in &survey {
        let (status, location) = match path {
            Some(path) => (
                Cell::new("found").fg(Color::Green),
                path.display().to_string(),
            ),
            None => (Cell::new("missing").fg(Color::Red), String::new()),
        };
        table.add_row(vec![Cell::new(tool.name()), status, Cell::new(location)]);
    }
    println!("{}", table);

    if survey.iter().any(|(_, path)| path.is_none()) {
        info("Install BLAST+ with: blastui tools install");
    }

    if args.all_versions {
        let manager = ToolManager::with_directory(blastui_tools_dir());
        let versions = manager.list_versions()?;
        section_header("Managed installations");
        if versions.is_empty() {
            empty("No managed BLAST+ installations");
        }
        for (i, version) in versions.iter().enumerate() {
            let label = if version.is_current {
                format!("{} (current)", version.version)
            } else {
                version.version.clone()
            };
            tree_item(
                i + 1 == versions.len(),
                &label,
                Some(&version.installed_date.format("%Y-%m-%d").to_string()),
            );
        }
    }

    Ok(())
}
