use std::io::{self, Write};

use anyhow::{Context, Result};

use crate::{Config, ExitCode};

/// `cmdpool config`: print every effective setting with its source.
pub fn execute_config_command(config: &Config) -> Result<ExitCode> {
    let mut out = io::stdout().lock();
    write_effective_config(config, &mut out).context("Failed to write configuration")?;
    Ok(ExitCode::SUCCESS)
}

fn write_effective_config(config: &Config, out: &mut impl Write) -> io::Result<()> {
    match &config.config_file {
        Some(path) => writeln!(out, "Config file: {}", path.display())?,
        None => writeln!(out, "Config file: none")?,
    }
    writeln!(out)?;

    let effective = config.effective_config();
    let width = effective.keys().map(String::len).max().unwrap_or(0);
    for (key, (value, source)) in &effective {
        writeln!(out, "  {key:<width$} = {value}  ({source})")?;
    }
    Ok(())
}
