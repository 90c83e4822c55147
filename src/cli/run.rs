//! CLI entry point and dispatch logic
//!
//! `run()` parses arguments, loads the configuration, dispatches to the
//! subcommand, and prints every error itself.

use clap::Parser;
use tracing::debug;

use super::args::{Cli, Commands};
use super::commands;
use crate::{CliArgs, CmdpoolError, Config, ExitCode};

/// Main CLI execution function.
///
/// Returns `Ok(())` when the process should exit with status 0, otherwise the
/// exit code. Errors are already printed when this returns; `main` only maps
/// the code to the process status.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    if let Err(err) = cmdpool_utils::init_tracing(cli.verbose) {
        eprintln!("cmdpool: logging unavailable: {err}");
    }

    let cli_args = cli_args(&cli);
    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => {
            let err = CmdpoolError::from(err);
            eprint!("{}", err.display_for_user());
            return Err(err.to_exit_code());
        }
    };
    debug!(config_file = ?config.config_file, "Configuration loaded");

    let result = match cli.command {
        Commands::Run { file, debug, .. } => {
            commands::execute_run_command(file.as_deref(), debug, &config)
        }
        Commands::Which { name, full } => commands::execute_which_command(&name, full, &config),
        Commands::Config => commands::execute_config_command(&config),
    };

    match result {
        Ok(code) if code.is_success() => Ok(()),
        Ok(code) => Err(code),
        Err(error) => {
            if let Some(cmdpool_error) = error.downcast_ref::<CmdpoolError>() {
                eprint!("{}", cmdpool_error.display_for_user());
                Err(cmdpool_error.to_exit_code())
            } else {
                eprintln!("Error: {error:#}");
                Err(ExitCode::INTERNAL)
            }
        }
    }
}

/// Collect the configuration overrides given on the command line.
pub(crate) fn cli_args(cli: &Cli) -> CliArgs {
    let mut args = CliArgs {
        config_path: cli.config.clone(),
        verbose: Some(cli.verbose),
        ..CliArgs::default()
    };

    if let Commands::Run {
        workers,
        timeout,
        format,
        ordered,
        ..
    } = &cli.command
    {
        args.workers = *workers;
        args.timeout_secs = *timeout;
        args.output_format = format.clone();
        args.ordered = Some(*ordered);
    }

    args
}
