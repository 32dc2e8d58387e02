pub mod temp;

pub use temp::{TempWorkspace, WorkspaceConfig, WorkspaceMetadata, WorkspaceStats, WorkspaceStatus};
