//! Logging setup for cmdpool
//!
//! All diagnostics go to stderr so stdout carries only command results.

use std::io::IsTerminal;

use tracing::Level;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Filter used when `RUST_LOG` is unset.
#[must_use]
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "cmdpool=debug,info"
    } else {
        "cmdpool=info,warn"
    }
}

fn use_color() -> bool {
    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over [`default_filter`]. Verbose mode adds
/// targets and span close events. Fails if a subscriber is already installed.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(verbose)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(use_color())
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .compact();

    if verbose {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                layer
                    .with_target(true)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.with_target(false).with_thread_names(false))
            .try_init()?;
    }

    Ok(())
}

/// Span around one batch on the calling thread. In verbose mode its close
/// event reports how long the batch took.
pub fn dispatch_span(commands: usize, workers: usize) -> tracing::Span {
    tracing::span!(Level::INFO, "dispatch", commands, workers)
}
