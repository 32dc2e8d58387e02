#![cfg(unix)]

mod common;

use anyhow::Result;
use blastui_test::{fixtures, FakeBlast};
use predicates::prelude::*;

use common::*;

#[test]
fn test_cli_help_command() {
    blastui_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Local BLAST searches"))
        .stdout(predicate::str::contains("database"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("results"));
}

#[test]
fn test_cli_version_command() {
    blastui_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("blastui"));
}

#[test]
fn test_database_list_empty() -> Result<()> {
    let env = CliEnv::new()?;
    env.cmd()
        .args(["database", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No databases"));
    Ok(())
}

#[test]
fn test_database_add_list_verify_delete() -> Result<()> {
    let env = CliEnv::new()?;
    env.add_genomes("genomes")?;

    env.cmd()
        .args(["database", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("genomes"))
        .stdout(predicate::str::contains("indexed"));

    env.cmd()
        .args(["database", "list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"molecule_type\": \"nucleotide\""));

    env.cmd()
        .args(["database", "verify", "genomes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All databases are indexed"));

    env.cmd()
        .args(["database", "delete", "genomes"])
        .assert()
        .success();
    assert!(!env.home().join("databases").join("genomes").exists());
    Ok(())
}

#[test]
fn test_search_prints_and_saves_hits() -> Result<()> {
    let env = CliEnv::new()?;
    env.add_genomes("genomes")?;
    let args_file = env.path("blastn.args");
    env.install_blast(
        FakeBlast::new("blastn")
            .with_stdout(fixtures::extended_payload())
            .record_args(&args_file),
    )?;
    let queries = env.write_file("queries.fasta", &fixtures::nucleotide_queries())?;
    let output = env.path("results.json");

    env.cmd()
        .args(["search", "--db", "genomes", "--query"])
        .arg(&queries)
        .arg("--output")
        .arg(&output)
        .args(["-j", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("genomeA_NODE_1"))
        .stdout(predicate::str::contains("genomeC_NODE_2"))
        .stdout(predicate::str::contains("4 hits"));

    let saved = read(&output);
    assert!(saved.contains("\"database\": \"genomes\""));
    assert!(saved.contains("genomeB_NODE_3"));

    let args = read(&args_file);
    let args: Vec<&str> = args.lines().collect();
    assert!(args.windows(2).any(|w| w == ["-num_threads", "2"]));
    Ok(())
}

#[test]
fn test_search_pasted_sequence_as_json() -> Result<()> {
    let env = CliEnv::new()?;
    env.add_genomes("genomes")?;
    env.install_blast(FakeBlast::new("blastn").with_stdout(fixtures::zero_hit_payload()))?;

    env.cmd()
        .args(["search", "--db", "genomes", "--sequence", "ATGCGT", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"hits\": []"))
        .stdout(predicate::str::contains("Query_1"));
    Ok(())
}

#[test]
fn test_results_show_with_filter() -> Result<()> {
    let env = CliEnv::new()?;
    let results = env.write_results("results.json")?;

    env.cmd()
        .args(["results", "show"])
        .arg(&results)
        .args(["--where", "pident>=90", "--sort", "-bitscore"])
        .assert()
        .success()
        .stdout(predicate::str::contains("genomeA_NODE_1"))
        .stdout(predicate::str::contains("genomeC_NODE_2"))
        .stdout(predicate::str::contains("genomeA_NODE_7").not())
        .stdout(predicate::str::contains("3 hits"));
    Ok(())
}

#[test]
fn test_results_summary_and_best() -> Result<()> {
    let env = CliEnv::new()?;
    let results = env.write_results("results.json")?;

    env.cmd()
        .args(["results", "show", "--summary"])
        .arg(&results)
        .assert()
        .success()
        .stdout(predicate::str::contains("query_1"))
        .stdout(predicate::str::contains("2.5e-5"));

    let best = env.path("best.json");
    env.cmd()
        .args(["results", "best"])
        .arg(&results)
        .arg("--output")
        .arg(&best)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved 2 best hits"));
    let saved = read(&best);
    assert!(saved.contains("genomeA_NODE_1"));
    assert!(!saved.contains("genomeB_NODE_3"));
    Ok(())
}

#[test]
fn test_results_export_formats() -> Result<()> {
    let env = CliEnv::new()?;
    let results = env.write_results("results.json")?;

    let csv = env.path("hits.csv");
    env.cmd()
        .args(["results", "export"])
        .arg(&results)
        .arg("--output")
        .arg(&csv)
        .assert()
        .success();
    let text = read(&csv);
    assert!(text.starts_with("qseqid,sseqid,pident"));
    assert_eq!(text.lines().count(), 5);

    let xlsx = env.path("hits.xlsx");
    env.cmd()
        .args(["results", "export"])
        .arg(&results)
        .arg("--output")
        .arg(&xlsx)
        .assert()
        .success();
    env.cmd()
        .args(["results", "show"])
        .arg(&xlsx)
        .assert()
        .success()
        .stdout(predicate::str::contains("genomeB_NODE_3"));

    let fasta = env.path("picked.out");
    env.cmd()
        .args(["results", "export"])
        .arg(&results)
        .args(["--format", "fasta", "--rows", "1,3"])
        .arg("--output")
        .arg(&fasta)
        .assert()
        .success();
    let text = read(&fasta);
    assert!(text.starts_with(">genomeA_NODE_1 query=query_1"));
    assert!(text.contains(">genomeA_NODE_7"));
    assert_eq!(text.matches('>').count(), 2);
    Ok(())
}

#[test]
fn test_results_filter_saves_subset() -> Result<()> {
    let env = CliEnv::new()?;
    let results = env.write_results("results.json")?;
    let subset = env.path("subset.tsv");

    env.cmd()
        .args(["results", "filter"])
        .arg(&results)
        .args(["--where", "strain=genomeA"])
        .arg("--output")
        .arg(&subset)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved 2 matching hits"));
    assert_eq!(read(&subset).lines().count(), 3);
    Ok(())
}

#[test]
fn test_results_chart_and_alignments() -> Result<()> {
    let env = CliEnv::new()?;
    let results = env.write_results("results.json")?;
    let chart = env.path("coverage.svg");

    env.cmd()
        .args(["results", "chart"])
        .arg(&results)
        .arg("--output")
        .arg(&chart)
        .assert()
        .success();
    assert!(read(&chart).contains("<svg"));

    env.cmd()
        .args(["results", "alignments"])
        .arg(&results)
        .args(["--rows", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains(">genomeA_NODE_7"))
        .stdout(predicate::str::contains("Query= query_1"))
        .stdout(predicate::str::contains("Sbjct"));
    Ok(())
}

#[test]
fn test_results_analyze() -> Result<()> {
    let env = CliEnv::new()?;
    let results = env.write_results("results.json")?;

    env.cmd()
        .args(["results", "analyses"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stop-codons"))
        .stdout(predicate::str::contains("multi-hit-genomes"));

    env.cmd()
        .args(["results", "analyze", "multi-hit-genomes"])
        .arg(&results)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 of 4 hits"))
        .stdout(predicate::str::contains("genomeA_NODE_7"));

    env.cmd()
        .args(["results", "analyze", "query-summary"])
        .arg(&results)
        .assert()
        .success()
        .stdout(predicate::str::contains("query_2: 1 hits"));
    Ok(())
}

#[test]
fn test_tools_list_reports_fakes() -> Result<()> {
    let env = CliEnv::new()?;
    env.install_blast(FakeBlast::new("blastn"))?;

    env.cmd()
        .args(["tools", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("makeblastdb"))
        .stdout(predicate::str::contains("found"));
    Ok(())
}
