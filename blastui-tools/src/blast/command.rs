use super::params::SearchParams;
use blastui_core::BlastProgram;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Tabular columns requested from every search, in order
pub const OUTPUT_COLUMNS: &[&str] = &[
    "qseqid", "sseqid", "pident", "length", "mismatch", "gapopen", "qstart", "qend", "sstart",
    "send", "evalue", "bitscore", "qlen", "slen", "nident", "gaps", "qseq", "sseq",
];

/// Value of `-outfmt`: `6 qseqid sseqid ... sseq`
pub fn output_format() -> String {
    format!("6 {}", OUTPUT_COLUMNS.join(" "))
}

/// A fully specified BLAST invocation
#[derive(Debug, Clone)]
pub struct BlastCommand {
    pub executable: PathBuf,
    pub program: BlastProgram,
    pub query_file: PathBuf,
    /// Index prefix passed to `-db`
    pub database: PathBuf,
    pub params: SearchParams,
}

impl BlastCommand {
    pub fn new(
        executable: impl Into<PathBuf>,
        program: BlastProgram,
        query_file: impl Into<PathBuf>,
        database: impl Into<PathBuf>,
        params: SearchParams,
    ) -> Self {
        Self {
            executable: executable.into(),
            program,
            query_file: query_file.into(),
            database: database.into(),
            params,
        }
    }

    /// Command-line arguments, without the executable
    pub fn args(&self) -> Vec<OsString> {
        let p = &self.params;
        let mut args: Vec<OsString> = Vec::new();
        let mut push = |flag: &str, value: OsString| {
            args.push(flag.into());
            args.push(value);
        };

        push("-query", self.query_file.clone().into_os_string());
        push("-db", self.database.clone().into_os_string());
        push("-outfmt", output_format().into());
        push("-evalue", p.evalue.to_string().into());
        push("-max_target_seqs", p.max_target_seqs.to_string().into());
        push("-num_threads", p.effective_threads().to_string().into());

        if let Some(word_size) = p.word_size {
            push("-word_size", word_size.to_string().into());
        }

        if self.program.uses_matrix() {
            if let Some(matrix) = p.matrix {
                push("-matrix", matrix.name().into());
            }
        }

        if let Some((open, extend)) = p.gap_costs {
            push("-gapopen", open.to_string().into());
            push("-gapextend", extend.to_string().into());
        }

        if let Some(coverage) = p.qcov_hsp_perc {
            push("-qcov_hsp_perc", coverage.to_string().into());
        }

        let filter = if p.low_complexity_filter { "yes" } else { "no" };
        match self.program {
            BlastProgram::Blastn => push("-dust", filter.into()),
            _ => push("-seg", filter.into()),
        }

        args
    }

    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.args(self.args());
        cmd
    }

    /// Shell-like rendering for logs
    pub fn display(&self) -> String {
        let mut parts = vec![self.executable.display().to_string()];
        for arg in self.args() {
            let arg = arg.to_string_lossy().into_owned();
            if arg.contains(' ') {
                parts.push(format!("\"{}\"", arg));
            } else {
                parts.push(arg);
            }
        }
        parts.join(" ")
    }

    pub fn database_path(&self) -> &Path {
        &self.database
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blastui_core::ScoringMatrix;
    use pretty_assertions::assert_eq;

    fn args_of(cmd: &BlastCommand) -> Vec<String> {
        cmd.args()
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn value_of(args: &[String], flag: &str) -> Option<String> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1).cloned())
    }

    #[test]
    fn test_output_format_columns() {
        assert_eq!(
            output_format(),
            "6 qseqid sseqid pident length mismatch gapopen qstart qend sstart send evalue bitscore qlen slen nident gaps qseq sseq"
        );
    }

    #[test]
    fn test_blastn_arguments() {
        let params = SearchParams {
            evalue: 1e-5,
            max_target_seqs: 25,
            word_size: Some(11),
            qcov_hsp_perc: Some(10.0),
            threads: 2,
            low_complexity_filter: false,
            ..Default::default()
        };
        let cmd = BlastCommand::new("blastn", BlastProgram::Blastn, "q.fasta", "/db/genomes/blastdb", params);
        let args = args_of(&cmd);

        assert_eq!(value_of(&args, "-query").as_deref(), Some("q.fasta"));
        assert_eq!(value_of(&args, "-db").as_deref(), Some("/db/genomes/blastdb"));
        assert_eq!(value_of(&args, "-outfmt"), Some(output_format()));
        assert_eq!(value_of(&args, "-evalue").as_deref(), Some("0.00001"));
        assert_eq!(value_of(&args, "-max_target_seqs").as_deref(), Some("25"));
        assert_eq!(value_of(&args, "-word_size").as_deref(), Some("11"));
        assert_eq!(value_of(&args, "-qcov_hsp_perc").as_deref(), Some("10"));
        assert_eq!(value_of(&args, "-num_threads").as_deref(), Some("2"));
        assert_eq!(value_of(&args, "-dust").as_deref(), Some("no"));
        assert!(value_of(&args, "-matrix").is_none());
        assert!(value_of(&args, "-seg").is_none());
    }

    #[test]
    fn test_protein_arguments() {
        let params = SearchParams {
            matrix: Some(ScoringMatrix::Pam30),
            gap_costs: Some((9, 1)),
            threads: 1,
            ..Default::default()
        };
        let cmd = BlastCommand::new("blastp", BlastProgram::Blastp, "q.fasta", "prot/blastdb", params);
        let args = args_of(&cmd);

        assert_eq!(value_of(&args, "-matrix").as_deref(), Some("PAM30"));
        assert_eq!(value_of(&args, "-gapopen").as_deref(), Some("9"));
        assert_eq!(value_of(&args, "-gapextend").as_deref(), Some("1"));
        assert_eq!(value_of(&args, "-seg").as_deref(), Some("yes"));
        assert!(value_of(&args, "-qcov_hsp_perc").is_none());
    }

    #[test]
    fn test_display_quotes_outfmt() {
        let cmd = BlastCommand::new(
            "/usr/bin/blastn",
            BlastProgram::Blastn,
            "q.fasta",
            "db",
            SearchParams {
                threads: 1,
                ..Default::default()
            },
        );
        let shown = cmd.display();
        assert!(shown.starts_with("/usr/bin/blastn -query q.fasta -db db -outfmt \"6 qseqid"));
    }
}
