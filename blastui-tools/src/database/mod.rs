//! Local sequence databases: metadata, indexing and the registry

pub mod indexer;
pub mod metadata;
pub mod registry;

pub use indexer::{IndexReport, Indexer};
pub use metadata::{SequenceDatabase, INDEX_PREFIX, METADATA_FILE};
pub use registry::{validate_database_name, DatabaseRegistry, RegisterOptions};
