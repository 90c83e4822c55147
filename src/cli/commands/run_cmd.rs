use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::input::read_commands;
use crate::{
    CmdpoolError, Config, DispatchOptions, DispatchReport, Dispatcher, ExitCode, OutputFormat,
};

/// `cmdpool run`: dispatch the command list and print the results.
///
/// Returns [`ExitCode::COMMANDS_FAILED`] unless every command ran and
/// succeeded.
pub fn execute_run_command(file: Option<&Path>, debug: bool, config: &Config) -> Result<ExitCode> {
    let commands = read_commands(file)?;
    let mut out = io::stdout().lock();

    if debug {
        for command in &commands {
            writeln!(out, "{command}").context("Failed to write command list")?;
        }
        return Ok(ExitCode::SUCCESS);
    }

    let runner = config.shell_runner().map_err(CmdpoolError::from)?;
    let options = DispatchOptions::new(config.workers()).verbose(config.verbose());

    let span = cmdpool_utils::logging::dispatch_span(commands.len(), options.workers());
    let report = {
        let _entered = span.enter();
        Dispatcher::new(runner)
            .dispatch(commands, &options)
            .map_err(CmdpoolError::from)?
    };
    let report = if config.ordered() {
        report.into_ordered()
    } else {
        report
    };

    let written = match config.output_format() {
        OutputFormat::Text => render_text(&report, &mut out),
        OutputFormat::Json => serde_json::to_writer_pretty(&mut out, &report)
            .map_err(io::Error::from)
            .and_then(|()| writeln!(out)),
    };
    written.context("Failed to write results")?;

    info!(
        succeeded = report.succeeded,
        failed = report.failed,
        "Batch complete"
    );

    Ok(if report.all_succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::COMMANDS_FAILED
    })
}

/// Human-readable report: one block per result, then a summary line.
pub fn render_text(report: &DispatchReport, out: &mut impl Write) -> io::Result<()> {
    for output in report.outputs() {
        let status = if output.success() { "ok" } else { "FAILED" };
        writeln!(
            out,
            "[{status}] exit {} ({:.1} ms): {}",
            output.exit_code(),
            output.elapsed_millis(),
            output.command()
        )?;
        for line in output.std_out().lines() {
            writeln!(out, "  stdout | {line}")?;
        }
        for line in output.std_err().lines() {
            writeln!(out, "  stderr | {line}")?;
        }
    }

    write!(
        out,
        "{} commands: {} succeeded, {} failed",
        report.submitted, report.succeeded, report.failed
    )?;
    if report.not_run() > 0 {
        write!(out, ", {} not run", report.not_run())?;
    }
    writeln!(
        out,
        " ({:.1} ms on {} workers)",
        report.elapsed_millis, report.workers
    )
}
