use std::fmt;
use std::path::PathBuf;

use cmdpool_pool::DispatchError;
use thiserror::Error;

use crate::exit_codes::ExitCode;

/// Top-level error for cmdpool operations.
#[derive(Error, Debug)]
pub enum CmdpoolError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Failed to read commands from {source_name}: {source}")]
    CommandInput {
        source_name: String,
        #[source]
        source: std::io::Error,
    },
}

impl CmdpoolError {
    /// Exit code of the `cmdpool` process when this error ends it.
    #[must_use]
    pub fn to_exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) | Self::CommandInput { .. } => ExitCode::CLI_ARGS,
            Self::Dispatch(_) => ExitCode::INTERNAL,
        }
    }

    /// Message, context, and suggestions, formatted for stderr.
    #[must_use]
    pub fn display_for_user(&self) -> String {
        let mut output = format!("Error: {}\n", self.user_message());

        if let Some(ctx) = self.context() {
            output.push_str(&format!("\nContext: {ctx}\n"));
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in suggestions {
                output.push_str(&format!("  • {suggestion}\n"));
            }
        }

        output
    }
}

/// Errors are rendered for people, not just logged.
pub trait UserFriendlyError {
    /// One-line description of what went wrong.
    fn user_message(&self) -> String;

    /// Background that helps explain the failure.
    fn context(&self) -> Option<String>;

    /// Things the user can try.
    fn suggestions(&self) -> Vec<String>;

    fn category(&self) -> ErrorCategory;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Concurrency,
    FileSystem,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Concurrency => write!(f, "Concurrency"),
            Self::FileSystem => write!(f, "File System"),
        }
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration file {path}: {reason}")]
    InvalidFile { path: PathBuf, reason: String },

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found at {path}")]
    NotFound { path: PathBuf },

    #[error("Configuration discovery failed: {reason}")]
    DiscoveryFailed { reason: String },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::Read { path, source } => {
                format!("Could not read configuration file {}: {source}", path.display())
            }
            Self::InvalidFile { path, reason } => {
                format!(
                    "Configuration file {} has invalid format: {reason}",
                    path.display()
                )
            }
            Self::InvalidValue { key, value } => {
                format!("Configuration '{key}' has invalid value: {value}")
            }
            Self::NotFound { path } => {
                format!("Configuration file not found: {}", path.display())
            }
            Self::DiscoveryFailed { reason } => {
                format!("Failed to discover configuration: {reason}")
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Read { .. } | Self::NotFound { .. } => Some(
                "cmdpool searches for .cmdpool/config.toml from the current directory upward, \
                 stopping at the repository root."
                    .to_string(),
            ),
            Self::InvalidFile { .. } => Some(
                "Configuration files must be valid TOML with optional [defaults] and [shell] sections."
                    .to_string(),
            ),
            Self::InvalidValue { key, .. } => Some(format!(
                "The '{key}' option has specific format requirements."
            )),
            Self::DiscoveryFailed { .. } => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Read { .. } => vec![
                "Check the file permissions".to_string(),
                "Pass --config with a readable file".to_string(),
            ],
            Self::InvalidFile { .. } => vec![
                "Check the TOML syntax".to_string(),
                "Remove unknown keys; only [defaults] and [shell] are recognized".to_string(),
            ],
            Self::InvalidValue { key, .. } => match key.as_str() {
                "workers" => vec!["Use a positive integer, e.g. workers = 4".to_string()],
                "timeout_secs" => vec![
                    "Use a positive number of seconds".to_string(),
                    "Remove the option to run without a timeout".to_string(),
                ],
                "output_format" => vec!["Use \"text\" or \"json\"".to_string()],
                "shell.program" | "shell.flag" => vec![
                    "Set both program and flag, e.g. program = \"bash\", flag = \"-c\"".to_string(),
                    "Remove the [shell] section to use the platform shell".to_string(),
                ],
                _ => vec!["Remove the option to use the default value".to_string()],
            },
            Self::NotFound { .. } => vec![
                "Check the path passed to --config".to_string(),
                "Omit --config to use discovery and defaults".to_string(),
            ],
            Self::DiscoveryFailed { .. } => vec![
                "Check that the current directory exists and is readable".to_string(),
                "Pass --config to skip discovery".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

impl UserFriendlyError for CmdpoolError {
    fn user_message(&self) -> String {
        match self {
            Self::Config(err) => err.user_message(),
            Self::Dispatch(DispatchError::WorkerSpawn { worker, source }) => {
                format!("Could not start worker thread {worker}: {source}")
            }
            Self::Dispatch(DispatchError::WorkerPanicked { worker }) => {
                format!("Worker thread {worker} panicked while running commands")
            }
            Self::CommandInput {
                source_name,
                source,
            } => format!("Could not read commands from {source_name}: {source}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Config(err) => err.context(),
            Self::Dispatch(DispatchError::WorkerSpawn { .. }) => Some(
                "No worker thread could start, so no command ran.".to_string(),
            ),
            Self::Dispatch(DispatchError::WorkerPanicked { .. }) => {
                Some("Results from the batch are incomplete.".to_string())
            }
            Self::CommandInput { .. } => {
                Some("Commands are read one per line from a file or stdin.".to_string())
            }
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(err) => err.suggestions(),
            Self::Dispatch(DispatchError::WorkerSpawn { .. }) => vec![
                "Lower --workers".to_string(),
                "Check the process and thread limits (ulimit -u)".to_string(),
            ],
            Self::Dispatch(DispatchError::WorkerPanicked { .. }) => vec![
                "Re-run with --verbose and RUST_LOG=cmdpool=debug".to_string(),
                "Report the failure with the command list that triggered it".to_string(),
            ],
            Self::CommandInput { .. } => vec![
                "Check that the file exists and is readable".to_string(),
                "Pipe commands on stdin instead of passing a file".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(err) => err.category(),
            Self::Dispatch(_) => ErrorCategory::Concurrency,
            Self::CommandInput { .. } => ErrorCategory::FileSystem,
        }
    }
}
