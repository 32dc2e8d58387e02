use crate::cli::output::*;
use blastui_core::blastui_tools_dir;
use blastui_tools::ToolManager;
use blastui_utils::create_spinner;
use clap::Args;
use std::time::Duration;

#[derive(Args)]
pub struct InstallArgs {
    /// Version to install, e.g. 2.15.0 (latest when omitted)
    pub version: Option<String>,

    /// Download from this mirror instead of NCBI
    #[arg(long)]
    pub mirror: Option<String>,
}

#[derive(Args)]
pub struct UseArgs {
    /// Installed version to make current
    pub version: String,
}

fn manager() -> ToolManager {
    ToolManager::with_directory(blastui_tools_dir())
}

pub fn run(args: InstallArgs) -> anyhow::Result<()> {
    let _span = tracing::info_span!("tools_install").entered();

    let mut manager = manager();
    if let Some(url) = args.mirror {
        manager = manager.with_base_url(url);
    }

    let spinner = create_spinner(&match &args.version {
        Some(v) => format!("Installing BLAST+ {}...", v),
        None => "Installing the latest BLAST+...".to_string(),
    });
    spinner.enable_steady_tick(Duration::from_millis(120));

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(manager.install(args.version.as_deref()));
    spinner.finish_and_clear();
    let version = result?;

    success(&format!("Installed BLAST+ {}", version));
    let bin_dir = manager.suite_dir().join(&version).join("bin");
    info(&format!("Executables in {}", bin_dir.display()));
    Ok(())
}

pub fn run_use(args: UseArgs) -> anyhow::Result<()> {
    manager().set_current_version(&args.version)?;
    success(&format!("BLAST+ {} is now current", args.version));
    Ok(())
}
