//! Finding BLAST+ executables and asking them for their version

use crate::runner::ProcessRunner;
use crate::types::Tool;
use blastui_core::{BlastUiResult, SubprocessError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;
use std::time::Duration;

static VERSION_RE: OnceLock<Regex> = OnceLock::new();

const VERSION_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolves tool names to executable paths.
///
/// Explicit directories are searched in order; `$PATH` is consulted last
/// unless disabled.
#[derive(Debug, Clone)]
pub struct ToolLocator {
    search_dirs: Vec<PathBuf>,
    use_path: bool,
}

impl ToolLocator {
    /// Locator for the usual layout: a configured executables directory, then
    /// the managed installation under `<tools_dir>/blast/current/bin`, then `$PATH`
    pub fn new(tools_dir: &Path, executables_dir: Option<&Path>) -> Self {
        let mut search_dirs = Vec::new();
        if let Some(dir) = executables_dir {
            search_dirs.push(dir.to_path_buf());
        }
        search_dirs.push(managed_bin_dir(tools_dir));
        Self {
            search_dirs,
            use_path: true,
        }
    }

    /// Locator restricted to the given directories
    pub fn with_dirs<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            search_dirs: dirs.into_iter().map(Into::into).collect(),
            use_path: false,
        }
    }

    pub fn with_path_lookup(mut self, enabled: bool) -> Self {
        self.use_path = enabled;
        self
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Path of `tool`, or `SubprocessError::NotFound`
    pub fn locate(&self, tool: Tool) -> BlastUiResult<PathBuf> {
        self.find(tool)
            .ok_or_else(|| SubprocessError::NotFound(tool.name().to_string()).into())
    }

    pub fn find(&self, tool: Tool) -> Option<PathBuf> {
        let binary = tool.binary_name();
        for dir in &self.search_dirs {
            let candidate = dir.join(&binary);
            if is_executable(&candidate) {
                tracing::debug!("Found {} at {}", tool.name(), candidate.display());
                return Some(candidate);
            }
        }

        if self.use_path {
            if let Ok(path) = which::which(&binary) {
                tracing::debug!("Found {} on PATH at {}", tool.name(), path.display());
                return Some(path);
            }
        }

        None
    }

    /// Version reported by `<tool> -version`, e.g. `2.15.0`
    pub fn version(&self, tool: Tool) -> BlastUiResult<String> {
        let exe = self.locate(tool)?;
        let mut command = Command::new(&exe);
        command.arg("-version");

        let output = ProcessRunner::new(tool.name())
            .with_timeout(Some(VERSION_TIMEOUT))
            .run(command)?;
        let text = String::from_utf8_lossy(&output.stdout);

        parse_version(&text).ok_or_else(|| {
            SubprocessError::Output {
                program: tool.name().to_string(),
                message: format!("could not find a version number in '{}'", text.trim()),
            }
            .into()
        })
    }

    /// Every known tool with its resolved path, if any
    pub fn survey(&self) -> Vec<(Tool, Option<PathBuf>)> {
        Tool::all().iter().map(|&tool| (tool, self.find(tool))).collect()
    }
}

/// `<tools_dir>/blast/current/bin`
pub fn managed_bin_dir(tools_dir: &Path) -> PathBuf {
    tools_dir.join("blast").join("current").join("bin")
}

/// First `x.y.z` in the output of `-version`
pub fn parse_version(text: &str) -> Option<String> {
    let re = VERSION_RE.get_or_init(|| Regex::new(r"(\d+\.\d+\.\d+)").expect("static pattern"));
    re.captures(text).map(|c| c[1].to_string())
}

fn is_executable(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(path) {
            Ok(metadata) => metadata.permissions().mode() & 0o111 != 0,
            Err(_) => false,
        }
    }

    #[cfg(not(unix))]
    {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_version() {
        let text = "blastn: 2.15.0+\n Package: blast 2.15.0, build Oct 19 2023 13:35:57\n";
        assert_eq!(parse_version(text), Some("2.15.0".to_string()));
        assert_eq!(parse_version("makeblastdb: 2.2.31+"), Some("2.2.31".to_string()));
        assert_eq!(parse_version("no version here"), None);
    }

    #[test]
    fn test_managed_bin_dir() {
        let dir = managed_bin_dir(Path::new("/opt/blastui/tools"));
        assert_eq!(dir, PathBuf::from("/opt/blastui/tools/blast/current/bin"));
    }

    #[test]
    fn test_new_orders_search_dirs() {
        let locator = ToolLocator::new(Path::new("/tools"), Some(Path::new("/custom/bin")));
        assert_eq!(
            locator.search_dirs(),
            &[
                PathBuf::from("/custom/bin"),
                PathBuf::from("/tools/blast/current/bin")
            ]
        );
    }

    #[test]
    fn test_locate_missing_tool() {
        let dir = tempfile::TempDir::new().unwrap();
        let locator = ToolLocator::with_dirs([dir.path()]);
        let err = locator.locate(Tool::Tblastx).unwrap_err();
        assert!(err.to_string().contains("tblastx"));
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use blastui_test::mock::MOCK_BLAST_VERSION;
        use blastui_test::{FakeBlast, FakeMakeblastdb};
        use pretty_assertions::assert_eq;

        #[test]
        fn test_first_directory_wins() {
            let first = tempfile::TempDir::new().unwrap();
            let second = tempfile::TempDir::new().unwrap();
            FakeBlast::new("blastp").install(second.path()).unwrap();
            let winner = FakeBlast::new("blastp").install(first.path()).unwrap();

            let locator = ToolLocator::with_dirs([first.path(), second.path()]);
            assert_eq!(locator.locate(Tool::Blastp).unwrap(), winner);
        }

        #[test]
        fn test_non_executable_file_is_skipped() {
            let dir = tempfile::TempDir::new().unwrap();
            std::fs::write(dir.path().join("blastn"), "not a program").unwrap();
            let locator = ToolLocator::with_dirs([dir.path()]);
            assert!(locator.find(Tool::Blastn).is_none());
        }

        #[test]
        fn test_version_and_survey() {
            let dir = tempfile::TempDir::new().unwrap();
            FakeBlast::new("blastn").install(dir.path()).unwrap();
            FakeMakeblastdb::new().install(dir.path()).unwrap();

            let locator = ToolLocator::with_dirs([dir.path()]);
            assert_eq!(locator.version(Tool::Blastn).unwrap(), MOCK_BLAST_VERSION);
            assert_eq!(locator.version(Tool::Makeblastdb).unwrap(), MOCK_BLAST_VERSION);

            let survey = locator.survey();
            assert_eq!(survey.len(), Tool::all().len());
            let found: Vec<Tool> = survey
                .iter()
                .filter(|(_, path)| path.is_some())
                .map(|(tool, _)| *tool)
                .collect();
            assert_eq!(found, vec![Tool::Blastn, Tool::Makeblastdb]);
        }
    }
}
