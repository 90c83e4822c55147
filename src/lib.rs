//! cmdpool: run batches of shell commands across a fixed pool of worker threads
//!
//! Each command runs through the platform shell with stdout and stderr
//! captured separately and its wall-clock time measured. Failures of any kind
//! (non-zero exit, signal, spawn error, timeout) become a failed [`RunOutput`]
//! instead of aborting the batch.
//!
//! # Example
//!
//! ```rust,no_run
//! use cmdpool::{DispatchOptions, Dispatcher, ShellRunner};
//! use std::time::Duration;
//!
//! let runner = ShellRunner::new().with_timeout(Duration::from_secs(30));
//! let report = Dispatcher::new(runner)
//!     .dispatch(["make -C a", "make -C b", "make -C c"], &DispatchOptions::new(2))?
//!     .into_ordered();
//!
//! for output in report.outputs() {
//!     println!("{} -> {}", output.command(), output.exit_code());
//! }
//! # Ok::<(), cmdpool::DispatchError>(())
//! ```
//!
//! # Crates
//!
//! - `cmdpool-runner`: single command execution ([`ShellRunner`], [`RunOutput`])
//! - `cmdpool-pool`: the worker pool ([`Dispatcher`], [`CommandPool`])
//! - `cmdpool-config`: configuration discovery ([`Config`])
//! - `cmdpool-utils`: errors, exit codes, logging

pub mod cli;
pub mod input;

pub use cmdpool_config::{CliArgs, Config, ConfigBuilder, ConfigSource, OutputFormat};
pub use cmdpool_pool::{
    CommandPool, DispatchError, DispatchOptions, DispatchReport, Dispatcher, IndexedOutput,
    PendingCommand, ProgressReporter, dispatch_all,
};
pub use cmdpool_runner::{
    CommandLine, EXIT_CAPTURE_FAILURE, EXIT_SPAWN_FAILURE, EXIT_TIMED_OUT, FailureKind,
    ProcessRunner, RunOutput, Shell, ShellRunner, locate_command, locate_command_output,
};
pub use cmdpool_utils::{CmdpoolError, ConfigError, ErrorCategory, ExitCode, UserFriendlyError};
