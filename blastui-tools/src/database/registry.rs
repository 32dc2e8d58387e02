//! Registry of local BLAST databases.
//!
//! Every database lives in its own directory under the registry root:
//!
//! ```text
//! <root>/<name>/
//!     blastdb.nin blastdb.nhr blastdb.nsq   (or p* for protein)
//!     metadata.json
//! ```

use super::indexer::Indexer;
use super::metadata::{SequenceDatabase, METADATA_FILE};
use crate::locator::ToolLocator;
use crate::types::Tool;
use blastui_bio::{genome_name_from_path, parse_fasta, prepare_contigs, write_fasta, ContigPreparation, Sequence};
use blastui_core::{BlastUiError, BlastUiResult, MoleculeType, ValidationError};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const STAGED_INPUT: &str = "input.fasta";

/// Options for building a database from FASTA files
#[derive(Debug, Clone, Default)]
pub struct RegisterOptions {
    pub preparation: ContigPreparation,
    /// Defaults to the database name
    pub title: Option<String>,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct DatabaseRegistry {
    root: PathBuf,
    locator: ToolLocator,
}

impl DatabaseRegistry {
    pub fn new(root: impl Into<PathBuf>, locator: ToolLocator) -> Self {
        Self {
            root: root.into(),
            locator,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn database_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.database_dir(name).join(METADATA_FILE).is_file()
    }

    /// All registered databases, sorted by name
    pub fn list(&self) -> BlastUiResult<Vec<SequenceDatabase>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut databases = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            let hidden = path
                .file_name()
                .and_then(|n| n.to_str())
                .map_or(true, |n| n.starts_with('.'));
            if !path.is_dir() || hidden {
                continue;
            }

            let metadata_path = path.join(METADATA_FILE);
            if !metadata_path.is_file() {
                tracing::debug!("Skipping {}: no {}", path.display(), METADATA_FILE);
                continue;
            }

            match read_metadata(&metadata_path) {
                Ok(db) => databases.push(db),
                Err(e) => tracing::warn!("Ignoring {}: {}", metadata_path.display(), e),
            }
        }

        databases.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(databases)
    }

    pub fn get(&self, name: &str) -> BlastUiResult<SequenceDatabase> {
        validate_database_name(name)?;
        let metadata_path = self.database_dir(name).join(METADATA_FILE);
        if !metadata_path.is_file() {
            return Err(BlastUiError::NotFound(format!("database '{}'", name)));
        }
        read_metadata(&metadata_path)
    }

    /// Remove a database and all of its files
    pub fn delete(&self, name: &str) -> BlastUiResult<SequenceDatabase> {
        let database = self.get(name)?;
        fs::remove_dir_all(&database.path).map_err(|e| {
            BlastUiError::Database(format!(
                "failed to remove {}: {}",
                database.path.display(),
                e
            ))
        })?;
        tracing::info!("Deleted database {}", name);
        Ok(database)
    }

    /// The database, provided its index files are present
    pub fn validate_indexed(&self, name: &str) -> BlastUiResult<SequenceDatabase> {
        let database = self.get(name)?;
        if !database.is_indexed() {
            return Err(ValidationError::DatabaseNotIndexed(name.to_string()).into());
        }
        Ok(database)
    }

    /// Build and register a database from one or more FASTA files.
    ///
    /// Each file is treated as one genome. When `molecule` is `None` the type
    /// is detected from the first sequence. On any failure the partially
    /// built directory is removed.
    pub fn register(
        &self,
        name: &str,
        fasta_files: &[PathBuf],
        molecule: Option<MoleculeType>,
        options: &RegisterOptions,
    ) -> BlastUiResult<SequenceDatabase> {
        validate_database_name(name)?;
        if fasta_files.is_empty() {
            return Err(ValidationError::InvalidParameter(
                "at least one FASTA file is required to build a database".to_string(),
            )
            .into());
        }

        let dir = self.database_dir(name);
        if dir.exists() {
            return Err(BlastUiError::AlreadyExists(format!("database '{}'", name)));
        }

        let makeblastdb = self.locator.locate(Tool::Makeblastdb)?;

        let mut sequences: Vec<Sequence> = Vec::new();
        let mut dropped = 0;
        for file in fasta_files {
            let genome = genome_name_from_path(file);
            let prepared = prepare_contigs(&genome, parse_fasta(file)?, &options.preparation);
            tracing::debug!(
                "{}: {} contigs kept, {} dropped",
                file.display(),
                prepared.sequences.len(),
                prepared.dropped
            );
            dropped += prepared.dropped;
            sequences.extend(prepared.sequences);
        }

        if sequences.is_empty() {
            return Err(BlastUiError::Database(format!(
                "no sequences left to index for '{}' ({} dropped)",
                name, dropped
            )));
        }

        let molecule = molecule.unwrap_or_else(|| sequences[0].detect_type());
        let title = options.title.clone().unwrap_or_else(|| name.to_string());

        fs::create_dir_all(&dir)?;
        let guard = BuildGuard::new(&dir);

        let staged = dir.join(STAGED_INPUT);
        write_fasta(&staged, &sequences, 80)?;

        let database = SequenceDatabase {
            name: name.to_string(),
            path: dir.clone(),
            molecule_type: molecule,
            sequence_count: sequences.len(),
            total_residues: sequences.iter().map(|s| s.len() as u64).sum(),
            created_at: Utc::now(),
            title,
            source_files: fasta_files.to_vec(),
            size: 0,
        };

        let report = Indexer::new(makeblastdb)
            .with_timeout(options.timeout)
            .build(&staged, &database.index_prefix(), molecule, &database.title)?;

        if let Err(e) = fs::remove_file(&staged) {
            tracing::warn!("Failed to remove {}: {}", staged.display(), e);
        }

        if !database.is_indexed() {
            return Err(BlastUiError::Database(format!(
                "makeblastdb finished but no {} index was written for '{}'",
                molecule, name
            )));
        }

        if let Some(added) = report.sequences_added {
            if added != database.sequence_count {
                tracing::warn!(
                    "makeblastdb added {} sequences, expected {}",
                    added,
                    database.sequence_count
                );
            }
        }

        let database = SequenceDatabase {
            size: directory_size(&dir)?,
            ..database
        };
        let json = serde_json::to_string_pretty(&database)?;
        fs::write(database.metadata_path(), json)?;

        guard.commit();
        tracing::info!(
            "Registered {} database '{}' ({} sequences)",
            molecule,
            name,
            database.sequence_count
        );
        Ok(database)
    }
}

/// Name rules: non-empty, no path separators or whitespace, not `.`/`..`
pub fn validate_database_name(name: &str) -> Result<(), ValidationError> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name == "." || name == ".." {
        Some("name cannot be '.' or '..'")
    } else if name.contains(['/', '\\']) {
        Some("name cannot contain path separators")
    } else if name.chars().any(char::is_whitespace) {
        Some("name cannot contain whitespace")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ValidationError::InvalidDatabaseName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

fn read_metadata(path: &Path) -> BlastUiResult<SequenceDatabase> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn directory_size(dir: &Path) -> BlastUiResult<u64> {
    let mut total = 0;
    for entry in fs::read_dir(dir)? {
        let metadata = entry?.metadata()?;
        if metadata.is_file() {
            total += metadata.len();
        }
    }
    Ok(total)
}

/// Removes a half-built database directory unless committed
struct BuildGuard {
    path: PathBuf,
    committed: bool,
}

impl BuildGuard {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            committed: false,
        }
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for BuildGuard {
    fn drop(&mut self) {
        if !self.committed {
            tracing::debug!("Removing incomplete database at {}", self.path.display());
            if let Err(e) = fs::remove_dir_all(&self.path) {
                tracing::warn!("Failed to remove {}: {}", self.path.display(), e);
            }
        }
    }
}
