//! Configuration management for cmdpool
//!
//! Hierarchical configuration with discovery and precedence:
//! CLI > config file > defaults. The config file is TOML with optional
//! `[defaults]` and `[shell]` sections:
//!
//! ```toml
//! [defaults]
//! workers = 8
//! verbose = false
//! timeout_secs = 300
//! output_format = "json"
//! ordered = true
//!
//! [shell]
//! program = "bash"
//! flag = "-c"
//! ```

mod builder;
mod cli_args;
mod discovery;
mod model;
mod validation;

pub use builder::ConfigBuilder;
pub use cli_args::CliArgs;
pub use discovery::{CONFIG_DIR, CONFIG_FILE};
pub use model::{Config, ConfigSource, Defaults, OutputFormat, ShellConfig};
