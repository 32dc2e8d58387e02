//! makeblastdb invocation

use crate::runner::ProcessRunner;
use blastui_core::{BlastUiResult, MoleculeType};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;
use std::time::Duration;

static ADDED_RE: OnceLock<Regex> = OnceLock::new();

/// What makeblastdb reported after a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexReport {
    /// From "added N sequences", when present
    pub sequences_added: Option<usize>,
    pub stdout: String,
}

#[derive(Debug, Clone)]
pub struct Indexer {
    executable: PathBuf,
    timeout: Option<Duration>,
}

impl Indexer {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn command(&self, input: &Path, prefix: &Path, molecule: MoleculeType, title: &str) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.arg("-in")
            .arg(input)
            .args(["-input_type", "fasta", "-parse_seqids", "-dbtype", molecule.dbtype_flag()])
            .arg("-out")
            .arg(prefix)
            .args(["-title", title]);
        cmd
    }

    /// Index `input` into `prefix`.
    ///
    /// A rejection by makeblastdb comes back as `NonZeroExit` with its stderr
    /// untouched.
    pub fn build(
        &self,
        input: &Path,
        prefix: &Path,
        molecule: MoleculeType,
        title: &str,
    ) -> BlastUiResult<IndexReport> {
        let output = ProcessRunner::new("makeblastdb")
            .with_timeout(self.timeout)
            .run(self.command(input, prefix, molecule, title))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let sequences_added = parse_added_count(&stdout);
        tracing::info!(
            "makeblastdb indexed {} sequences into {}",
            sequences_added.map_or_else(|| "?".to_string(), |n| n.to_string()),
            prefix.display()
        );

        Ok(IndexReport {
            sequences_added,
            stdout,
        })
    }
}

fn parse_added_count(stdout: &str) -> Option<usize> {
    let re = ADDED_RE.get_or_init(|| Regex::new(r"added (\d+) sequences").expect("static pattern"));
    re.captures(stdout).and_then(|c| c[1].parse().ok())
}
