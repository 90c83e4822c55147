use std::sync::Arc;

use crate::RunOutput;

// ============================================================================
// ProcessRunner Trait - Single Command Execution Interface
// ============================================================================

/// Trait for executing one shell command line.
///
/// # Contract
///
/// - Blocks until the child has exited and both output streams are drained.
/// - Never retries.
/// - Never panics or returns an error for a failing command: spawn failures,
///   capture failures, signals and timeouts are all reported through the
///   returned [`RunOutput`].
///
/// # Threading
///
/// `ProcessRunner` is a synchronous interface. The worker pool shares one
/// runner across all of its threads, so implementations used there must be
/// `Sync`.
///
/// # Example
///
/// ```rust
/// use cmdpool_runner::{ProcessRunner, RunOutput};
///
/// struct EchoRunner;
///
/// impl ProcessRunner for EchoRunner {
///     fn run(&self, command: &str) -> RunOutput {
///         RunOutput::new(command, 0, command, "", 0.0)
///     }
/// }
///
/// let output = EchoRunner.run("hello");
/// assert!(output.success());
/// assert_eq!(output.std_out(), "hello");
/// ```
pub trait ProcessRunner {
    /// Execute `command` and return its outcome.
    fn run(&self, command: &str) -> RunOutput;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    fn run(&self, command: &str) -> RunOutput {
        (**self).run(command)
    }
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for Box<R> {
    fn run(&self, command: &str) -> RunOutput {
        (**self).run(command)
    }
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for Arc<R> {
    fn run(&self, command: &str) -> RunOutput {
        (**self).run(command)
    }
}
