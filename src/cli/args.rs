//! CLI argument definitions

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

/// cmdpool - run shell commands in parallel on a fixed pool of workers
#[derive(Debug, Parser)]
#[command(name = "cmdpool")]
#[command(about = "Run batches of shell commands across a fixed pool of worker threads")]
#[command(long_about = r#"
cmdpool reads shell command lines, runs them concurrently on a fixed number of
worker threads, and reports each command's exit code, output, and duration.
A failing command never stops the rest of the batch.

EXAMPLES:
  # Run every line of jobs.txt on 8 workers
  cmdpool run jobs.txt --workers 8

  # Read commands from stdin and print a JSON report in submission order
  printf 'echo a\necho b\n' | cmdpool run --format json --ordered

  # Show which commands would run without running them
  cmdpool run jobs.txt --debug

  # Check whether a program is on PATH
  cmdpool which rsync

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > config file > defaults
  Config file is discovered by searching upward from CWD for .cmdpool/config.toml
  Use --config to specify an explicit config file path

EXIT CODES:
  0  every command succeeded
  1  internal failure
  2  invalid arguments or configuration
  3  at least one command failed
  4  `which` found nothing
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Report progress for every command on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run commands read one per line from FILE (or stdin)
    Run {
        /// File with one command per line; `-` or omitted reads stdin
        file: Option<PathBuf>,

        /// Number of worker threads [default: available parallelism]
        #[arg(short = 'j', long)]
        workers: Option<usize>,

        /// Print the commands that would run, then exit without running them
        #[arg(long)]
        debug: bool,

        /// Kill any command still running after SECS seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// Result format
        #[arg(long, value_parser = ["text", "json"])]
        format: Option<String>,

        /// Report results in submission order instead of completion order
        #[arg(long)]
        ordered: bool,
    },

    /// Check whether a command is available on PATH
    Which {
        /// Command name to look up
        name: String,

        /// Print the full lookup result as JSON
        #[arg(long)]
        full: bool,
    },

    /// Show the effective configuration and where each value came from
    Config,
}

/// Build the clap command, for completions and tests.
#[must_use]
pub fn build_cli() -> clap::Command {
    Cli::command()
}
