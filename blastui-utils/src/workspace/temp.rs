//! Per-session temporary workspace.
//!
//! Query files live here while a search runs. The directory is removed when
//! the workspace is dropped unless it is preserved for debugging.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Configuration for workspace behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Directory under which workspaces are created
    pub root: PathBuf,
    /// Whether to preserve workspace on failure (for debugging)
    pub preserve_on_failure: bool,
    /// Whether to preserve workspace always (for inspection)
    pub preserve_always: bool,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: blastui_core::blastui_workspace_dir(),
            preserve_on_failure: std::env::var("BLASTUI_PRESERVE_ON_FAILURE").is_ok(),
            preserve_always: std::env::var("BLASTUI_PRESERVE_ALWAYS").is_ok(),
        }
    }
}

impl WorkspaceConfig {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum WorkspaceStatus {
    Active,
    Completed,
    Failed,
    Preserved,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceStats {
    pub searches_run: usize,
    pub queries_submitted: usize,
    pub hits_parsed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceMetadata {
    pub id: String,
    pub created_at: i64,
    pub command: String,
    pub status: WorkspaceStatus,
    pub error_message: Option<String>,
    pub stats: WorkspaceStats,
}

/// Represents a single workspace instance
#[derive(Debug)]
pub struct TempWorkspace {
    /// Unique identifier for this workspace
    pub id: String,
    /// Root path of this workspace
    pub root: PathBuf,
    config: WorkspaceConfig,
    had_error: bool,
    metadata: WorkspaceMetadata,
    cleaned: bool,
}

impl TempWorkspace {
    /// Create a new workspace with a unique ID
    pub fn new(command: &str) -> Result<Self> {
        Self::with_config(command, WorkspaceConfig::default())
    }

    /// Create a new workspace with custom configuration
    pub fn with_config(command: &str, config: WorkspaceConfig) -> Result<Self> {
        fs::create_dir_all(&config.root)
            .with_context(|| format!("Failed to create workspace root: {:?}", config.root))?;

        let timestamp = chrono::Utc::now().timestamp();
        let id = format!("{}_{}", timestamp, Uuid::new_v4());

        let root = config.root.join(&id);
        for subdir in ["queries", "metadata"] {
            fs::create_dir_all(root.join(subdir))
                .with_context(|| format!("Failed to create subdirectory: {}", subdir))?;
        }

        let metadata = WorkspaceMetadata {
            id: id.clone(),
            created_at: timestamp,
            command: command.to_string(),
            status: WorkspaceStatus::Active,
            error_message: None,
            stats: WorkspaceStats::default(),
        };

        let workspace = Self {
            id,
            root,
            config,
            had_error: false,
            metadata,
            cleaned: false,
        };

        workspace.save_metadata()?;
        tracing::debug!("Created workspace {}", workspace.root.display());

        Ok(workspace)
    }

    /// Get path to a specific subdirectory
    pub fn get_path(&self, component: &str) -> PathBuf {
        self.root.join(component)
    }

    /// Path of the FASTA file for the `n`-th search of this session
    pub fn query_file(&self, n: usize) -> PathBuf {
        self.get_path("queries").join(format!("query_{:03}.fasta", n))
    }

    pub fn metadata(&self) -> &WorkspaceMetadata {
        &self.metadata
    }

    /// Update metadata
    pub fn update_metadata<F>(&mut self, updater: F) -> Result<()>
    where
        F: FnOnce(&mut WorkspaceMetadata),
    {
        updater(&mut self.metadata);
        self.save_metadata()
    }

    /// Save metadata to disk
    pub fn save_metadata(&self) -> Result<()> {
        let metadata_path = self.get_path("metadata").join("workspace.json");
        let json = serde_json::to_string_pretty(&self.metadata)?;
        fs::write(&metadata_path, json)
            .with_context(|| format!("Failed to save metadata: {:?}", metadata_path))?;
        Ok(())
    }

    /// Mark workspace as having an error
    pub fn mark_error(&mut self, error: &str) -> Result<()> {
        self.had_error = true;
        self.update_metadata(|m| {
            m.status = WorkspaceStatus::Failed;
            m.error_message = Some(error.to_string());
        })
    }

    /// Mark workspace as completed successfully
    pub fn mark_completed(&mut self) -> Result<()> {
        self.update_metadata(|m| m.status = WorkspaceStatus::Completed)
    }

    /// Update workspace statistics
    pub fn update_stats<F>(&mut self, updater: F) -> Result<()>
    where
        F: FnOnce(&mut WorkspaceStats),
    {
        self.update_metadata(|m| updater(&mut m.stats))
    }

    /// Remove one workspace file, logging instead of failing
    pub fn remove_file(&self, path: &Path) {
        if path.exists() {
            if let Err(e) = fs::remove_file(path) {
                tracing::warn!("Failed to remove {}: {}", path.display(), e);
            }
        }
    }

    /// Clean up the workspace (called on drop)
    pub fn cleanup(&mut self) -> Result<()> {
        if self.cleaned {
            return Ok(());
        }
        self.cleaned = true;

        let should_preserve =
            self.config.preserve_always || (self.config.preserve_on_failure && self.had_error);

        if should_preserve {
            let preserved_dir = self.config.root.join("preserved");
            fs::create_dir_all(&preserved_dir)?;

            let preserved_path = preserved_dir.join(&self.id);
            if preserved_path.exists() {
                fs::remove_dir_all(&preserved_path)?;
            }
            self.metadata.status = WorkspaceStatus::Preserved;
            self.save_metadata()?;
            fs::rename(&self.root, &preserved_path)?;

            eprintln!("Workspace preserved at: {:?}", preserved_path);
        } else if self.root.exists() {
            fs::remove_dir_all(&self.root)
                .with_context(|| format!("Failed to cleanup workspace: {:?}", self.root))?;
        }

        Ok(())
    }
}

impl Drop for TempWorkspace {
    fn drop(&mut self) {
        // Attempt cleanup, but don't panic on failure
        if let Err(e) = self.cleanup() {
            eprintln!("Warning: Failed to cleanup workspace: {}", e);
        }
    }
}
