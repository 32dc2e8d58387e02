//! Installation of the BLAST+ suite

pub mod installer;

pub use installer::{compare_versions, detect_platform, Release, ToolInfo, ToolManager};
