//! Isolated BlastUI directory trees for tests
//!
//! A `TestEnvironment` lays out `databases/`, `tools/`, `workspace/` and
//! `bin/` under a temporary root and removes it on drop. Nothing process-wide
//! is modified: the library caches `BLASTUI_*` lookups, so tests hand these
//! paths to the code under test directly, or export them to a child process
//! with [`TestEnvironment::env_vars`].

use crate::fixtures::{create_test_fasta, nucleotide_contigs};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[derive(Debug, Clone, Default)]
pub struct TestConfig {
    /// Keep the directory when the test was marked failed
    pub preserve_on_failure: bool,
    /// Prefix of the temporary directory name
    pub prefix: Option<String>,
    /// Skip writing the fake `makeblastdb` into `bin/`
    pub without_makeblastdb: bool,
}

pub struct TestEnvironment {
    temp_dir: Option<TempDir>,
    root: PathBuf,
    config: TestConfig,
    failed: bool,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        Self::with_config(TestConfig::default())
    }

    pub fn with_config(config: TestConfig) -> Result<Self> {
        let prefix = config.prefix.as_deref().unwrap_or("blastui-test");
        let temp_dir =
            TempDir::with_prefix(prefix).context("Failed to create temporary directory")?;
        let root = temp_dir.path().to_path_buf();

        for dir in ["databases", "tools", "workspace", "bin"] {
            std::fs::create_dir_all(root.join(dir))?;
        }

        let env = Self {
            temp_dir: Some(temp_dir),
            root,
            config,
            failed: false,
        };

        #[cfg(unix)]
        if !env.config.without_makeblastdb {
            crate::mock::FakeMakeblastdb::new().install(&env.bin_dir())?;
        }

        Ok(env)
    }

    /// Doubles as `BLASTUI_HOME`
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, name: impl AsRef<Path>) -> PathBuf {
        self.root.join(name)
    }

    pub fn databases_dir(&self) -> PathBuf {
        self.path("databases")
    }

    pub fn tools_dir(&self) -> PathBuf {
        self.path("tools")
    }

    pub fn workspace_dir(&self) -> PathBuf {
        self.path("workspace")
    }

    /// Where the fake executables live
    pub fn bin_dir(&self) -> PathBuf {
        self.path("bin")
    }

    /// `BLASTUI_*` variables pointing into this environment, for
    /// `Command::envs`
    pub fn env_vars(&self) -> Vec<(&'static str, PathBuf)> {
        vec![
            ("BLASTUI_HOME", self.root.clone()),
            ("BLASTUI_DATABASES_DIR", self.databases_dir()),
            ("BLASTUI_TOOLS_DIR", self.tools_dir()),
            ("BLASTUI_WORKSPACE_DIR", self.workspace_dir()),
        ]
    }

    /// Write a file relative to the root, creating parent directories
    pub fn write_file(&self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) -> Result<PathBuf> {
        let full_path = self.path(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&full_path, content)
            .with_context(|| format!("Failed to write {}", full_path.display()))?;
        Ok(full_path)
    }

    pub fn read_to_string(&self, path: impl AsRef<Path>) -> Result<String> {
        let full_path = self.path(path);
        std::fs::read_to_string(&full_path)
            .with_context(|| format!("Failed to read {}", full_path.display()))
    }

    /// The three test contigs as a FASTA file named `name`
    pub fn write_contigs(&self, name: &str) -> Result<PathBuf> {
        self.write_file(name, create_test_fasta(&nucleotide_contigs()))
    }

    #[cfg(unix)]
    pub fn install_blast(&self, fake: &crate::mock::FakeBlast) -> Result<PathBuf> {
        fake.install(&self.bin_dir())
    }

    #[cfg(unix)]
    pub fn install_makeblastdb(&self, fake: &crate::mock::FakeMakeblastdb) -> Result<PathBuf> {
        fake.install(&self.bin_dir())
    }

    /// Keep the directory on drop if `preserve_on_failure` is set
    pub fn mark_failed(&mut self) {
        self.failed = true;
    }

    /// Keep the directory regardless and print where it is
    pub fn preserve(&mut self) {
        if let Some(temp_dir) = self.temp_dir.take() {
            let path = temp_dir.keep();
            println!("Test environment preserved at: {}", path.display());
        }
    }
}

impl Drop for TestEnvironment {
    fn drop(&mut self) {
        if self.config.preserve_on_failure && self.failed {
            if let Some(temp_dir) = self.temp_dir.take() {
                let path = temp_dir.keep();
                eprintln!("Test failed, environment preserved at: {}", path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_created() {
        let env = TestEnvironment::new().unwrap();
        for dir in [env.databases_dir(), env.tools_dir(), env.workspace_dir(), env.bin_dir()] {
            assert!(dir.is_dir(), "{} missing", dir.display());
        }
        #[cfg(unix)]
        assert!(env.bin_dir().join("makeblastdb").is_file());
    }

    #[test]
    fn test_environments_are_isolated() {
        let env1 = TestEnvironment::new().unwrap();
        let env2 = TestEnvironment::new().unwrap();
        assert_ne!(env1.root(), env2.root());

        env1.write_file("nested/query.fasta", ">q1\nACGT\n").unwrap();
        assert_eq!(env1.read_to_string("nested/query.fasta").unwrap(), ">q1\nACGT\n");
        assert!(!env2.path("nested/query.fasta").exists());
    }

    #[test]
    fn test_env_vars_point_inside_root() {
        let env = TestEnvironment::new().unwrap();
        let vars = env.env_vars();
        assert_eq!(vars.len(), 4);
        assert!(vars.iter().all(|(_, path)| path.starts_with(env.root())));
    }

    #[test]
    fn test_cleanup_and_preserve() {
        let root = {
            let env = TestEnvironment::new().unwrap();
            env.root().to_path_buf()
        };
        assert!(!root.exists());

        let kept = {
            let mut env = TestEnvironment::with_config(TestConfig {
                preserve_on_failure: true,
                without_makeblastdb: true,
                ..TestConfig::default()
            })
            .unwrap();
            env.mark_failed();
            env.root().to_path_buf()
        };
        assert!(kept.exists());
        std::fs::remove_dir_all(kept).unwrap();
    }
}
