//! Test utilities for the BlastUI workspace
//!
//! Common helpers shared by the unit and integration tests of every BlastUI
//! crate:
//!
//! - **Test Environment**: an isolated BlastUI directory tree with automatic
//!   cleanup
//! - **Fixtures**: FASTA inputs and tabular BLAST payloads with known values
//! - **Mock executables**: shell scripts standing in for `blastn`,
//!   `makeblastdb` and friends (unix only)

pub mod environment;
pub mod fixtures;
#[cfg(unix)]
pub mod mock;

// Re-export commonly used items
pub use environment::{TestConfig, TestEnvironment};
pub use fixtures::{create_test_fasta, TestSequence};
#[cfg(unix)]
pub use mock::{FakeBlast, FakeMakeblastdb};

// Re-export test dependencies for convenience
pub use anyhow::{Context, Result};
pub use tempfile;

/// Initialize test logging (call once per test module)
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("BLASTUI_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Run a test with a clean environment
///
/// # Example
/// ```rust
/// use blastui_test::with_test_env;
///
/// with_test_env(|env| {
///     env.write_file("query.fasta", b">q1\nACGT\n")?;
///     assert!(env.root().join("query.fasta").exists());
///     Ok(())
/// })
/// .unwrap();
/// ```
pub fn with_test_env<F, R>(f: F) -> Result<R>
where
    F: FnOnce(&TestEnvironment) -> Result<R>,
{
    let env = TestEnvironment::new()?;
    f(&env)
}
