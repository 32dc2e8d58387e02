//! Running BLAST searches

pub mod command;
pub mod params;

pub use command::{output_format, BlastCommand, OUTPUT_COLUMNS};
pub use params::SearchParams;

use crate::runner::{ProcessOutput, ProcessProgress, ProcessRunner};
use blastui_core::{BlastUiError, BlastUiResult, MoleculeType, SubprocessError};

/// Run a search and return its raw tabular payload.
///
/// A failing search keeps BLAST's stderr verbatim; a hint is appended when
/// the diagnostics point at a database of the wrong molecule type.
pub fn run_search<F>(
    command: &BlastCommand,
    runner: &ProcessRunner,
    progress: F,
) -> BlastUiResult<ProcessOutput>
where
    F: FnMut(&ProcessProgress),
{
    tracing::debug!("{}", command.display());

    let output = runner
        .run_with_progress(command.to_command(), progress)
        .map_err(|err| match err {
            BlastUiError::Subprocess(SubprocessError::NonZeroExit {
                program,
                code,
                stderr,
            }) => {
                let stderr = match database_type_hint(&stderr, command) {
                    Some(hint) => format!("{}\nhint: {}", stderr.trim_end(), hint),
                    None => stderr,
                };
                SubprocessError::NonZeroExit {
                    program,
                    code,
                    stderr,
                }
                .into()
            }
            other => other,
        })?;

    for line in output.stderr.lines().filter(|l| !l.trim().is_empty()) {
        tracing::warn!("{}: {}", command.program, line.trim());
    }

    Ok(output)
}

/// Recognise BLAST's complaint about a missing index of one molecule type
pub fn database_type_hint(stderr: &str, command: &BlastCommand) -> Option<String> {
    let wanted = command.program.database_type();
    for molecule in [MoleculeType::Nucleotide, MoleculeType::Protein] {
        let needle = format!("No alias or index file found for {} database", molecule);
        if stderr.contains(&needle) {
            let other = match molecule {
                MoleculeType::Nucleotide => MoleculeType::Protein,
                MoleculeType::Protein => MoleculeType::Nucleotide,
            };
            return Some(format!(
                "{} needs a {} database; '{}' has no {} index (is it a {} database?)",
                command.program,
                wanted,
                command.database.display(),
                molecule,
                other
            ));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use blastui_core::BlastProgram;

    fn blastn_command() -> BlastCommand {
        BlastCommand::new(
            "blastn",
            BlastProgram::Blastn,
            "q.fasta",
            "/dbs/prots/blastdb",
            SearchParams::default(),
        )
    }

    #[test]
    fn test_hint_for_wrong_database_type() {
        let stderr = "BLAST Database error: No alias or index file found for nucleotide database [/dbs/prots/blastdb] in search path [/tmp::]\n";
        let hint = database_type_hint(stderr, &blastn_command()).unwrap();
        assert!(hint.contains("blastn needs a nucleotide database"));
        assert!(hint.contains("is it a protein database?"));
    }

    #[test]
    fn test_no_hint_for_other_errors() {
        assert!(database_type_hint("Segmentation fault", &blastn_command()).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_search_appends_hint_after_verbatim_stderr() {
        use blastui_test::FakeBlast;

        let dir = tempfile::TempDir::new().unwrap();
        let stderr = "BLAST Database error: No alias or index file found for nucleotide database [db] in search path [::]\n";
        let exe = FakeBlast::new("blastn")
            .with_stderr(stderr)
            .exit_code(2)
            .install(dir.path())
            .unwrap();

        let mut command = blastn_command();
        command.executable = exe;
        let err = run_search(&command, &ProcessRunner::new("blastn"), |_| {}).unwrap_err();
        let BlastUiError::Subprocess(sub) = err else {
            panic!("expected a subprocess error");
        };
        let text = sub.stderr().unwrap();
        assert!(text.starts_with(stderr.trim_end()));
        assert!(text.contains("\nhint: blastn needs a nucleotide database"));
    }
}
