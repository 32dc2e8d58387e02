//! Directory layout, resolved once per process from `BLASTUI_*` variables.
//!
//! ```text
//! $BLASTUI_HOME (~/.blastui)
//! ├── config.toml
//! ├── databases/<name>/{metadata.json, blastdb.*}   BLASTUI_DATABASES_DIR
//! └── tools/blast/<version>/bin                     BLASTUI_TOOLS_DIR
//! $BLASTUI_WORKSPACE_DIR ($TMPDIR/blastui)          per-session scratch
//! ```

use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

static HOME_DIR: OnceLock<PathBuf> = OnceLock::new();
static DATABASES_DIR: OnceLock<PathBuf> = OnceLock::new();
static TOOLS_DIR: OnceLock<PathBuf> = OnceLock::new();
static WORKSPACE_DIR: OnceLock<PathBuf> = OnceLock::new();

fn from_env_or(
    cell: &'static OnceLock<PathBuf>,
    var: &str,
    fallback: impl FnOnce() -> PathBuf,
) -> PathBuf {
    cell.get_or_init(|| env::var_os(var).map(PathBuf::from).unwrap_or_else(fallback))
        .clone()
}

/// `BLASTUI_HOME`, or `.blastui` in the user's home directory
pub fn blastui_home() -> PathBuf {
    from_env_or(&HOME_DIR, "BLASTUI_HOME", || {
        env::var_os("HOME")
            .or_else(|| env::var_os("USERPROFILE"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".blastui")
    })
}

pub fn blastui_databases_dir() -> PathBuf {
    from_env_or(&DATABASES_DIR, "BLASTUI_DATABASES_DIR", || {
        blastui_home().join("databases")
    })
}

/// Root of the managed BLAST+ installations
pub fn blastui_tools_dir() -> PathBuf {
    from_env_or(&TOOLS_DIR, "BLASTUI_TOOLS_DIR", || blastui_home().join("tools"))
}

/// Parent of the per-session temp workspaces
pub fn blastui_workspace_dir() -> PathBuf {
    from_env_or(&WORKSPACE_DIR, "BLASTUI_WORKSPACE_DIR", || {
        env::temp_dir().join("blastui")
    })
}

pub fn config_path() -> PathBuf {
    blastui_home().join("config.toml")
}

/// One line per resolved directory, for `-vv` diagnostics
pub fn describe_paths() -> String {
    [
        ("home", blastui_home()),
        ("config", config_path()),
        ("databases", blastui_databases_dir()),
        ("tools", blastui_tools_dir()),
        ("workspace", blastui_workspace_dir()),
    ]
    .iter()
    .map(|(label, path)| format!("{:>10}: {}", label, path.display()))
    .collect::<Vec<_>>()
    .join("\n")
}
