use blastui_core::MoleculeType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sequence {
    pub id: String,
    pub description: Option<String>,
    pub sequence: Vec<u8>,
}

impl Sequence {
    pub fn new(id: impl Into<String>, sequence: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            description: None,
            sequence,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn detect_type(&self) -> MoleculeType {
        MoleculeType::detect(&self.sequence)
    }

    /// FASTA header line including the leading `>`
    pub fn header(&self) -> String {
        match &self.description {
            Some(desc) if !desc.is_empty() => format!(">{} {}", self.id, desc),
            _ => format!(">{}", self.id),
        }
    }

    pub fn sequence_str(&self) -> String {
        String::from_utf8_lossy(&self.sequence).into_owned()
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} residues)", self.id, self.len())
    }
}
