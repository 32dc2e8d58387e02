//! Common types for tool management

use anyhow::Result;
use blastui_core::BlastProgram;
use serde::{Deserialize, Serialize};

/// BLAST+ executables driven by BlastUI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tool {
    Blastn,
    Blastp,
    Blastx,
    Tblastn,
    Tblastx,
    Makeblastdb,
}

impl Tool {
    pub fn all() -> &'static [Tool] {
        &[
            Tool::Blastn,
            Tool::Blastp,
            Tool::Blastx,
            Tool::Tblastn,
            Tool::Tblastx,
            Tool::Makeblastdb,
        ]
    }

    /// Get the name of the tool
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Blastn => "blastn",
            Tool::Blastp => "blastp",
            Tool::Blastx => "blastx",
            Tool::Tblastn => "tblastn",
            Tool::Tblastx => "tblastx",
            Tool::Makeblastdb => "makeblastdb",
        }
    }

    /// Get the display name of the tool
    pub fn display_name(&self) -> &'static str {
        match self {
            Tool::Blastn => "BLASTN",
            Tool::Blastp => "BLASTP",
            Tool::Blastx => "BLASTX",
            Tool::Tblastn => "TBLASTN",
            Tool::Tblastx => "TBLASTX",
            Tool::Makeblastdb => "makeblastdb",
        }
    }

    /// Get the binary name for the tool
    pub fn binary_name(&self) -> String {
        if cfg!(windows) {
            format!("{}.exe", self.name())
        } else {
            self.name().to_string()
        }
    }

    pub fn is_search(&self) -> bool {
        !matches!(self, Tool::Makeblastdb)
    }
}

impl From<BlastProgram> for Tool {
    fn from(program: BlastProgram) -> Self {
        match program {
            BlastProgram::Blastn => Tool::Blastn,
            BlastProgram::Blastp => Tool::Blastp,
            BlastProgram::Blastx => Tool::Blastx,
            BlastProgram::Tblastn => Tool::Tblastn,
            BlastProgram::Tblastx => Tool::Tblastx,
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for Tool {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().trim_end_matches(".exe") {
            "blastn" => Ok(Tool::Blastn),
            "blastp" => Ok(Tool::Blastp),
            "blastx" => Ok(Tool::Blastx),
            "tblastn" => Ok(Tool::Tblastn),
            "tblastx" => Ok(Tool::Tblastx),
            "makeblastdb" => Ok(Tool::Makeblastdb),
            _ => anyhow::bail!("Unknown tool: {}", s),
        }
    }
}
