use blastui_core::MoleculeType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the metadata file stored next to the index files
pub const METADATA_FILE: &str = "metadata.json";

/// Prefix passed to `makeblastdb -out` and `blast* -db`
pub const INDEX_PREFIX: &str = "blastdb";

/// A registered, indexed sequence database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceDatabase {
    pub name: String,
    /// Directory holding the index files
    pub path: PathBuf,
    pub molecule_type: MoleculeType,
    pub sequence_count: usize,
    pub total_residues: u64,
    pub created_at: DateTime<Utc>,
    pub title: String,
    #[serde(default)]
    pub source_files: Vec<PathBuf>,
    /// Bytes on disk of the index files
    #[serde(default)]
    pub size: u64,
}

impl SequenceDatabase {
    /// `<path>/blastdb`
    pub fn index_prefix(&self) -> PathBuf {
        self.path.join(INDEX_PREFIX)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.path.join(METADATA_FILE)
    }

    /// Index files expected for a single-volume database
    pub fn index_files(&self) -> Vec<PathBuf> {
        index_files(&self.path, self.molecule_type)
    }

    pub fn alias_file(&self) -> PathBuf {
        self.path
            .join(format!("{}.{}", INDEX_PREFIX, self.molecule_type.alias_extension()))
    }

    /// Index present either as the full single-volume set or as an alias file
    pub fn is_indexed(&self) -> bool {
        self.index_files().iter().all(|p| p.is_file()) || self.alias_file().is_file()
    }
}

pub(crate) fn index_files(dir: &Path, molecule: MoleculeType) -> Vec<PathBuf> {
    molecule
        .index_extensions()
        .iter()
        .map(|ext| dir.join(format!("{}.{}", INDEX_PREFIX, ext)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database(dir: &Path, molecule: MoleculeType) -> SequenceDatabase {
        SequenceDatabase {
            name: "test".to_string(),
            path: dir.to_path_buf(),
            molecule_type: molecule,
            sequence_count: 3,
            total_residues: 113,
            created_at: Utc::now(),
            title: "test".to_string(),
            source_files: vec![],
            size: 0,
        }
    }

    #[test]
    fn test_index_layout() {
        let db = database(Path::new("/dbs/test"), MoleculeType::Protein);
        assert_eq!(db.index_prefix(), PathBuf::from("/dbs/test/blastdb"));
        assert_eq!(
            db.index_files(),
            vec![
                PathBuf::from("/dbs/test/blastdb.pin"),
                PathBuf::from("/dbs/test/blastdb.phr"),
                PathBuf::from("/dbs/test/blastdb.psq"),
            ]
        );
        assert_eq!(db.alias_file(), PathBuf::from("/dbs/test/blastdb.pal"));
    }

    #[test]
    fn test_is_indexed_accepts_volume_set_or_alias() {
        let dir = tempfile::TempDir::new().unwrap();
        let db = database(dir.path(), MoleculeType::Nucleotide);
        assert!(!db.is_indexed());

        std::fs::write(dir.path().join("blastdb.nin"), b"").unwrap();
        std::fs::write(dir.path().join("blastdb.nhr"), b"").unwrap();
        assert!(!db.is_indexed());

        std::fs::write(dir.path().join("blastdb.nsq"), b"").unwrap();
        assert!(db.is_indexed());

        let alias_only = tempfile::TempDir::new().unwrap();
        std::fs::write(alias_only.path().join("blastdb.nal"), b"").unwrap();
        assert!(database(alias_only.path(), MoleculeType::Nucleotide).is_indexed());
        assert!(!database(alias_only.path(), MoleculeType::Protein).is_indexed());
    }

    #[test]
    fn test_metadata_json_round_trip() {
        let db = database(Path::new("/dbs/test"), MoleculeType::Nucleotide);
        let json = serde_json::to_string(&db).unwrap();
        assert!(json.contains("\"molecule_type\":\"nucleotide\""));
        let back: SequenceDatabase = serde_json::from_str(&json).unwrap();
        assert_eq!(back, db);
    }
}
