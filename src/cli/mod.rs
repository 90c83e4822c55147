//! Command-line interface for cmdpool
//!
//! - `args`: clap argument definitions
//! - `run`: entry point, configuration and error reporting
//! - `commands`: subcommand implementations

pub mod args;
mod commands;
mod run;


pub use args::{Cli, Commands, build_cli};
pub use commands::render_text;
pub use run::run;
