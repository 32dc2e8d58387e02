//! Shared utilities for BlastUI
//!
//! Provides progress bars, number and duration formatting, and the
//! per-session temporary workspace.

pub mod display;
pub mod progress;
pub mod workspace;

// Re-export commonly used types
pub use display::{format_duration, format_number};
pub use progress::{create_hidden_progress_bar, create_progress_bar, create_spinner};
pub use workspace::{TempWorkspace, WorkspaceConfig, WorkspaceMetadata, WorkspaceStats, WorkspaceStatus};
