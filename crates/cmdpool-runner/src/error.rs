//! Error types for the runner crate

use thiserror::Error;

use crate::run_output::{EXIT_CAPTURE_FAILURE, EXIT_SPAWN_FAILURE};

/// Errors raised while preparing or supervising a single child process.
///
/// Only [`RunnerError::ConfigurationInvalid`] ever reaches a caller directly
/// (from [`Shell::new`](crate::Shell::new)). The execution variants are folded
/// into a failed [`RunOutput`](crate::RunOutput) by the runner.
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Runner configuration invalid: {reason}")]
    ConfigurationInvalid { reason: String },

    #[error("Failed to spawn '{program}': {reason}")]
    SpawnFailed { program: String, reason: String },

    #[error("Failed to capture process output: {reason}")]
    CaptureFailed { reason: String },
}

impl RunnerError {
    /// Sentinel exit code recorded when this error ends a command.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::SpawnFailed { .. } | Self::ConfigurationInvalid { .. } => EXIT_SPAWN_FAILURE,
            Self::CaptureFailed { .. } => EXIT_CAPTURE_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_failure_maps_to_spawn_sentinel() {
        let err = RunnerError::SpawnFailed {
            program: "sh".to_string(),
            reason: "No such file or directory".to_string(),
        };
        assert_eq!(err.exit_code(), EXIT_SPAWN_FAILURE);
        assert_eq!(
            err.to_string(),
            "Failed to spawn 'sh': No such file or directory"
        );
    }

    #[test]
    fn test_capture_failure_maps_to_capture_sentinel() {
        let err = RunnerError::CaptureFailed {
            reason: "broken pipe".to_string(),
        };
        assert_eq!(err.exit_code(), EXIT_CAPTURE_FAILURE);
    }
}
