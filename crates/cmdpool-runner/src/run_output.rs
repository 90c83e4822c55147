use serde::{Deserialize, Serialize};
use serde_json::json;

/// The shell could not be started (missing interpreter, permission denied,
/// resource exhaustion).
pub const EXIT_SPAWN_FAILURE: i32 = -1001;

/// The child's output pipes or exit status could not be collected.
pub const EXIT_CAPTURE_FAILURE: i32 = -1002;

/// The child was killed after exceeding the runner's timeout.
pub const EXIT_TIMED_OUT: i32 = -1003;

/// Largest signal number encoded as a negative exit code.
const MAX_SIGNAL: i32 = 128;

// ============================================================================
// RunOutput - Outcome of one executed command
// ============================================================================

/// Immutable record of one command's execution.
///
/// `success` is true if and only if the child exited normally with status 0.
/// Signal termination, spawn failure, capture failure and timeouts all use
/// negative exit codes, so `success == (exit_code == 0)` always holds for
/// records built through [`RunOutput::new`].
///
/// Both captured streams are trimmed of leading and trailing ASCII whitespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutput {
    success: bool,
    exit_code: i32,
    std_out: String,
    std_err: String,
    command: String,
    elapsed_millis: f64,
}

/// Classification of a failed [`RunOutput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The shell could not be started.
    SpawnFailure,
    /// The process ran and exited with this non-zero status.
    NonZeroExit(i32),
    /// The process was killed by this signal number.
    SignalTermination(i32),
    /// Output or exit status could not be collected.
    StreamCaptureFailure,
    /// The process exceeded the runner's timeout and was killed.
    TimedOut,
}

impl RunOutput {
    /// Create a new record. `success` is derived from `exit_code`.
    #[must_use]
    pub fn new(
        command: impl Into<String>,
        exit_code: i32,
        std_out: impl Into<String>,
        std_err: impl Into<String>,
        elapsed_millis: f64,
    ) -> Self {
        Self {
            success: exit_code == 0,
            exit_code,
            std_out: std_out.into(),
            std_err: std_err.into(),
            command: command.into(),
            elapsed_millis,
        }
    }

    #[must_use]
    pub const fn success(&self) -> bool {
        self.success
    }

    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.exit_code
    }

    #[must_use]
    pub fn std_out(&self) -> &str {
        &self.std_out
    }

    #[must_use]
    pub fn std_err(&self) -> &str {
        &self.std_err
    }

    /// The command line exactly as it was submitted.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Wall-clock time from spawn to reap, in milliseconds.
    #[must_use]
    pub const fn elapsed_millis(&self) -> f64 {
        self.elapsed_millis
    }

    /// Classify the failure, or `None` when the command succeeded.
    #[must_use]
    pub const fn failure_kind(&self) -> Option<FailureKind> {
        match self.exit_code {
            0 => None,
            EXIT_SPAWN_FAILURE => Some(FailureKind::SpawnFailure),
            EXIT_CAPTURE_FAILURE => Some(FailureKind::StreamCaptureFailure),
            EXIT_TIMED_OUT => Some(FailureKind::TimedOut),
            code if code < 0 && code >= -MAX_SIGNAL => Some(FailureKind::SignalTermination(-code)),
            code => Some(FailureKind::NonZeroExit(code)),
        }
    }

    /// JSON form of the record, tagged with its class name.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "class": "cmdpool::RunOutput",
            "command": self.command,
            "success": self.success,
            "exit_code": self.exit_code,
            "std_out": self.std_out,
            "std_err": self.std_err,
            "elapsed_millis": self.elapsed_millis,
        })
    }
}

impl From<&RunOutput> for bool {
    fn from(output: &RunOutput) -> Self {
        output.success
    }
}
