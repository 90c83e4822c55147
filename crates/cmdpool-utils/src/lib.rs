//! Foundation utilities shared by the cmdpool crates
//!
//! - [`error`]: the umbrella [`CmdpoolError`] and the [`UserFriendlyError`]
//!   trait used to render actionable messages
//! - [`exit_codes`]: process exit codes for the `cmdpool` binary
//! - [`logging`]: `tracing` subscriber setup

pub mod error;
pub mod exit_codes;
pub mod logging;

pub use error::{CmdpoolError, ConfigError, ErrorCategory, UserFriendlyError};
pub use exit_codes::ExitCode;
pub use logging::init_tracing;
