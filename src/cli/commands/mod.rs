//! Subcommand implementations.

mod run_cmd;
mod show_config;
mod which;

pub use run_cmd::{execute_run_command, render_text};
pub use show_config::execute_config_command;
pub use which::execute_which_command;
