//! Failures of external BLAST+ executables

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubprocessError {
    #[error("executable '{0}' was not found in the tools directory or on PATH")]
    NotFound(String),

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with code {code}:\n{stderr}")]
    NonZeroExit {
        program: String,
        code: i32,
        stderr: String,
    },

    #[error("{program} was terminated by signal {signal}:\n{stderr}")]
    Signal {
        program: String,
        signal: i32,
        stderr: String,
    },

    #[error("{program} did not finish within {timeout:?} and was killed")]
    Timeout { program: String, timeout: Duration },

    #[error("failed to read output of {program}: {message}")]
    Output { program: String, message: String },
}

impl SubprocessError {
    /// Diagnostic text emitted by the external tool, if any
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::NonZeroExit { stderr, .. } | Self::Signal { stderr, .. } => Some(stderr),
            _ => None,
        }
    }

    pub fn program(&self) -> &str {
        match self {
            Self::NotFound(program) => program,
            Self::Spawn { program, .. }
            | Self::NonZeroExit { program, .. }
            | Self::Signal { program, .. }
            | Self::Timeout { program, .. }
            | Self::Output { program, .. } => program,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonzero_exit_keeps_stderr_verbatim() {
        let stderr = "BLAST Database error: No alias or index file found for nucleotide database [x]";
        let err = SubprocessError::NonZeroExit {
            program: "blastn".to_string(),
            code: 2,
            stderr: stderr.to_string(),
        };
        assert!(err.to_string().ends_with(stderr));
        assert_eq!(err.stderr(), Some(stderr));
        assert_eq!(err.program(), "blastn");
    }

    #[test]
    fn test_timeout_display() {
        let err = SubprocessError::Timeout {
            program: "tblastx".to_string(),
            timeout: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "tblastx did not finish within 30s and was killed");
        assert!(err.stderr().is_none());

        let short = SubprocessError::Timeout {
            program: "blastn".to_string(),
            timeout: Duration::from_millis(300),
        };
        assert_eq!(short.to_string(), "blastn did not finish within 300ms and was killed");
    }
}
