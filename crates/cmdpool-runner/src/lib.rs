//! Single-command execution for cmdpool
//!
//! Runs one shell command line as a child process, captures stdout and stderr
//! separately, measures wall-clock time, and folds every outcome (including
//! spawn failures and timeouts) into an immutable [`RunOutput`].
//!
//! # Failure model
//!
//! [`ProcessRunner::run`] never returns an error and never panics on a bad
//! command. Failures are encoded in [`RunOutput::exit_code`]:
//!
//! | Exit code | Meaning |
//! |-----------|---------|
//! | `0` | Exited normally with status 0 |
//! | `> 0` | Exited normally with a non-zero status |
//! | `-1 ..= -128` | Killed by the signal of that (negated) number |
//! | [`EXIT_SPAWN_FAILURE`] | The shell could not be started |
//! | [`EXIT_CAPTURE_FAILURE`] | Output or exit status could not be collected |
//! | [`EXIT_TIMED_OUT`] | Killed after exceeding the configured timeout |

pub mod command_line;
pub mod error;
pub mod locate;
mod platform;
pub mod process;
pub mod run_output;
pub mod shell;

pub use command_line::CommandLine;
pub use error::RunnerError;
pub use locate::{locate_command, locate_command_output, locate_with};
pub use process::ProcessRunner;
pub use run_output::{
    EXIT_CAPTURE_FAILURE, EXIT_SPAWN_FAILURE, EXIT_TIMED_OUT, FailureKind, RunOutput,
};
pub use shell::{Shell, ShellRunner};
