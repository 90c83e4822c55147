use std::io::{self, Write};

use anyhow::{Context, Result};

use crate::{CmdpoolError, Config, ExitCode};

/// `cmdpool which`: look `name` up on PATH with the configured shell.
pub fn execute_which_command(name: &str, full: bool, config: &Config) -> Result<ExitCode> {
    let runner = config.shell_runner().map_err(CmdpoolError::from)?;
    let output = cmdpool_runner::locate_with(&runner, name);
    let mut out = io::stdout().lock();

    if full {
        let json = serde_json::to_string_pretty(&output.to_json())
            .context("Failed to serialize lookup result")?;
        writeln!(out, "{json}").context("Failed to write lookup result")?;
    } else if output.success() {
        writeln!(out, "{}", output.std_out()).context("Failed to write lookup result")?;
    } else {
        eprintln!("cmdpool: {name}: not found");
    }

    Ok(if output.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::NOT_FOUND
    })
}
