use super::{shell_quote, version_stanza, write_executable};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Fake `makeblastdb` that writes empty index files next to `-out`.
///
/// Inputs that do not start with `>` are rejected the way the real tool
/// rejects malformed FASTA.
#[derive(Debug, Clone, Default)]
pub struct FakeMakeblastdb {
    fail_with: Option<String>,
    args_file: Option<PathBuf>,
}

impl FakeMakeblastdb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always fail with the given stderr
    pub fn failing(stderr: impl Into<String>) -> Self {
        Self {
            fail_with: Some(stderr.into()),
            args_file: None,
        }
    }

    pub fn record_args(mut self, path: impl Into<PathBuf>) -> Self {
        self.args_file = Some(path.into());
        self
    }

    pub fn install(&self, dir: &Path) -> Result<PathBuf> {
        let mut script = String::from("#!/bin/sh\n");
        script.push_str(&version_stanza("makeblastdb"));
        if let Some(args) = &self.args_file {
            script.push_str(&format!(
                "for arg in \"$@\"; do echo \"$arg\"; done > {}\n",
                shell_quote(args)
            ));
        }
        if let Some(stderr) = &self.fail_with {
            let stderr_file = dir.join("makeblastdb.stderr");
            std::fs::create_dir_all(dir)?;
            std::fs::write(&stderr_file, stderr)?;
            script.push_str(&format!("cat {} >&2\nexit 1\n", shell_quote(&stderr_file)));
            return write_executable(dir, "makeblastdb", &script);
        }

        script.push_str(
            r#"IN=""
OUT=""
TYPE="nucl"
while [ $# -gt 0 ]; do
  case "$1" in
    -in) IN="$2"; shift 2 ;;
    -out) OUT="$2"; shift 2 ;;
    -dbtype) TYPE="$2"; shift 2 ;;
    *) shift ;;
  esac
done
if [ "$(head -c 1 "$IN")" != ">" ]; then
  echo "BLAST options error: File $IN is not in FASTA format" >&2
  exit 1
fi
if [ "$TYPE" = "prot" ]; then EXT="pin phr psq"; else EXT="nin nhr nsq"; fi
for e in $EXT; do : > "$OUT.$e"; done
COUNT=$(grep -c '>' "$IN")
echo "Building a new DB, current time: 01/01/2024 00:00:00"
echo "Adding sequences from FASTA; added $COUNT sequences in 0.001 seconds."
exit 0
"#,
        );
        write_executable(dir, "makeblastdb", &script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    #[test]
    fn test_fake_makeblastdb_writes_index_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let exe = FakeMakeblastdb::new().install(dir.path()).unwrap();
        let fasta = dir.path().join("in.fasta");
        std::fs::write(&fasta, ">a\nACGT\n>b\nGGCC\n").unwrap();
        let out = dir.path().join("db").join("blastdb");
        std::fs::create_dir_all(out.parent().unwrap()).unwrap();

        let output = Command::new(&exe)
            .arg("-in")
            .arg(&fasta)
            .args(["-dbtype", "nucl", "-out"])
            .arg(&out)
            .output()
            .unwrap();

        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("added 2 sequences"));
        for ext in ["nin", "nhr", "nsq"] {
            assert!(out.with_extension(ext).exists());
        }
    }

    #[test]
    fn test_fake_makeblastdb_rejects_non_fasta() {
        let dir = tempfile::TempDir::new().unwrap();
        let exe = FakeMakeblastdb::new().install(dir.path()).unwrap();
        let bad = dir.path().join("bad.fasta");
        std::fs::write(&bad, "ACGT\n").unwrap();

        let output = Command::new(&exe)
            .arg("-in")
            .arg(&bad)
            .args(["-dbtype", "nucl", "-out"])
            .arg(dir.path().join("blastdb"))
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&output.stderr).contains("not in FASTA format"));
    }
}
