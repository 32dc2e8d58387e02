#![cfg(unix)]

//! Register a database, locate the search program and run it, all against
//! the fake BLAST+ scripts.

use blastui_core::{BlastProgram, BlastUiError, SubprocessError};
use blastui_test::{fixtures, FakeBlast, TestEnvironment};
use blastui_tools::{
    run_search, BlastCommand, DatabaseRegistry, ProcessRunner, RegisterOptions, SearchParams,
    Tool, ToolLocator,
};
use pretty_assertions::assert_eq;
use std::time::Duration;

struct Fixture {
    env: TestEnvironment,
}

impl Fixture {
    fn new() -> Self {
        Self {
            env: TestEnvironment::new().unwrap(),
        }
    }

    fn locator(&self) -> ToolLocator {
        ToolLocator::with_dirs([self.env.bin_dir()])
    }

    fn registry(&self) -> DatabaseRegistry {
        DatabaseRegistry::new(self.env.databases_dir(), self.locator())
    }

    fn register_genomes(&self) -> blastui_tools::SequenceDatabase {
        let fasta = self.env.write_contigs("sampleA.fasta").unwrap();
        self.registry()
            .register("genomes", &[fasta], None, &RegisterOptions::default())
            .unwrap()
    }

    fn search(&self, blast: FakeBlast) -> Result<Vec<u8>, BlastUiError> {
        self.env.install_blast(&blast).unwrap();
        let db = self.registry().validate_indexed("genomes")?;
        let exe = self.locator().locate(Tool::from(BlastProgram::Blastn))?;

        let query = self
            .env
            .write_file("query.fasta", fixtures::nucleotide_queries())
            .unwrap();
        let command = BlastCommand::new(
            exe,
            BlastProgram::Blastn,
            &query,
            db.index_prefix(),
            SearchParams::default(),
        );
        let runner = ProcessRunner::new("blastn").with_timeout(Some(Duration::from_secs(10)));
        let output = run_search(&command, &runner, |_| {})?;
        Ok(output.stdout)
    }
}

#[test]
fn test_search_returns_payload_unchanged() {
    let fixture = Fixture::new();
    fixture.register_genomes();

    let stdout = fixture
        .search(FakeBlast::new("blastn").with_stdout(fixtures::extended_payload()))
        .unwrap();
    assert_eq!(String::from_utf8(stdout).unwrap(), fixtures::extended_payload());
}

#[test]
fn test_search_on_unindexed_database_fails_before_running() {
    let fixture = Fixture::new();
    let db = fixture.register_genomes();
    std::fs::remove_file(db.path.join("blastdb.nsq")).unwrap();

    let err = fixture.search(FakeBlast::new("blastn")).unwrap_err();
    assert!(matches!(err, BlastUiError::Validation(_)), "{err:?}");
}

#[test]
fn test_wrong_database_type_gets_hint() {
    let fixture = Fixture::new();
    fixture.register_genomes();

    let err = fixture
        .search(
            FakeBlast::new("blastn")
                .with_stderr("BLAST Database error: No alias or index file found for protein database [x]\n")
                .exit_code(2),
        )
        .unwrap_err();
    match err {
        BlastUiError::Subprocess(SubprocessError::NonZeroExit { code, stderr, .. }) => {
            assert_eq!(code, 2);
            assert!(stderr.starts_with("BLAST Database error"));
            assert!(stderr.contains("hint: blastn needs a nucleotide database"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_locator_reads_version() {
    let fixture = Fixture::new();
    fixture.env.install_blast(&FakeBlast::new("blastn")).unwrap();

    let locator = fixture.locator();
    assert_eq!(locator.version(Tool::Blastn).unwrap(), "2.15.0");
    assert!(locator.find(Tool::Blastp).is_none());

    let survey = locator.survey();
    let found: Vec<&str> = survey
        .iter()
        .filter(|(_, path)| path.is_some())
        .map(|(tool, _)| tool.name())
        .collect();
    assert_eq!(found, vec!["blastn", "makeblastdb"]);
}
