#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use blastui_core::BlastProgram;
use blastui_results::{parse_result_set, OutputColumns};
use blastui_test::{fixtures, FakeBlast, TestEnvironment};
use std::path::{Path, PathBuf};

/// The `blastui` binary with logging left at its default
pub fn blastui_cmd() -> Command {
    let mut cmd = Command::cargo_bin("blastui").unwrap();
    cmd.env_remove("BLASTUI_LOG");
    cmd
}

/// A throwaway BLASTUI_HOME whose config points at the fake BLAST+ scripts
pub struct CliEnv {
    pub env: TestEnvironment,
}

impl CliEnv {
    pub fn new() -> Result<Self> {
        let env = TestEnvironment::new()?;
        env.write_file(
            "config.toml",
            format!(
                "[blast]\nexecutables_dir = {:?}\ntimeout_secs = 60\n",
                env.bin_dir().display().to_string()
            ),
        )?;
        Ok(Self { env })
    }

    pub fn home(&self) -> &Path {
        self.env.root()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.env.path(name)
    }

    /// `blastui` pointed at this environment
    pub fn cmd(&self) -> Command {
        let mut cmd = blastui_cmd();
        cmd.envs(self.env.env_vars());
        cmd
    }

    pub fn install_blast(&self, fake: FakeBlast) -> Result<PathBuf> {
        self.env.install_blast(&fake)
    }

    pub fn write_file(&self, name: &str, content: &str) -> Result<PathBuf> {
        self.env.write_file(name, content)
    }

    /// Register the three test contigs as database `name`
    pub fn add_genomes(&self, name: &str) -> Result<()> {
        let fasta = self.env.write_contigs("sampleA.fasta")?;
        self.cmd()
            .args(["database", "add", name])
            .arg(&fasta)
            .assert()
            .success();
        Ok(())
    }

    /// The extended fixture payload saved as results JSON
    pub fn write_results(&self, name: &str) -> Result<PathBuf> {
        let results = parse_result_set(
            fixtures::extended_payload().as_bytes(),
            &OutputColumns::default(),
            vec!["query_1".into(), "query_2".into()],
        )?
        .with_source(BlastProgram::Blastn, "genomes");
        let path = self.path(name);
        results.save_json(&path)?;
        Ok(path)
    }
}

pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}
