//! Exit codes for the `cmdpool` binary.
//!
//! # Exit Code Table
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Every command ran and succeeded |
//! | 1 | `INTERNAL` | General/internal failure |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments or configuration |
//! | 3 | `COMMANDS_FAILED` | At least one command failed or never ran |
//! | 4 | `NOT_FOUND` | `cmdpool which` could not locate the command |
//!
//! These are the codes of the `cmdpool` process itself. The per-command
//! sentinels recorded in a `RunOutput` live in `cmdpool-runner`.

use crate::error::CmdpoolError;

/// Process exit code of the `cmdpool` binary.
///
/// # Example
///
/// ```rust
/// use cmdpool_utils::ExitCode;
///
/// assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
/// assert_eq!(ExitCode::COMMANDS_FAILED.as_i32(), 3);
/// assert_eq!(ExitCode::from_i32(4), ExitCode::NOT_FOUND);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Every command ran and succeeded.
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// General failure.
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// Invalid command-line arguments or configuration.
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// At least one command in the batch did not succeed.
    pub const COMMANDS_FAILED: ExitCode = ExitCode(3);

    /// A command lookup found nothing.
    pub const NOT_FOUND: ExitCode = ExitCode(4);

    /// Numeric value, for `std::process::exit()`.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }
}

impl From<i32> for ExitCode {
    fn from(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl From<&CmdpoolError> for ExitCode {
    fn from(err: &CmdpoolError) -> Self {
        err.to_exit_code()
    }
}
