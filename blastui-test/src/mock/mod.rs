//! Mock BLAST+ executables for testing
//!
//! Each mock is a small `/bin/sh` script written into a test directory. They
//! answer `-version` like the real tools and otherwise replay canned output.

mod blast;
mod makeblastdb;

pub use blast::FakeBlast;
pub use makeblastdb::FakeMakeblastdb;

use anyhow::Result;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Version string reported by every mock
pub const MOCK_BLAST_VERSION: &str = "2.15.0";

/// Write `script` to `dir/name` and mark it executable
pub(crate) fn write_executable(dir: &Path, name: &str, script: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(name);
    std::fs::write(&path, script)?;
    let mut perms = std::fs::metadata(&path)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms)?;
    Ok(path)
}

/// Quote a path for use inside a single-quoted shell word
pub(crate) fn shell_quote(path: &Path) -> String {
    format!("'{}'", path.display().to_string().replace('\'', r"'\''"))
}

pub(crate) fn version_stanza(name: &str) -> String {
    format!(
        "if [ \"$1\" = \"-version\" ]; then\n  echo \"{name}: {v}+\"\n  echo \" Package: blast {v}, build Jan 01 2024 00:00:00\"\n  exit 0\nfi\n",
        name = name,
        v = MOCK_BLAST_VERSION
    )
}
