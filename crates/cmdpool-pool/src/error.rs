//! Error types for the pool crate

use thiserror::Error;

/// Structural dispatch failures.
///
/// Individual command failures never show up here; they are recorded in the
/// command's [`RunOutput`](cmdpool_runner::RunOutput).
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Failed to start worker thread {worker}: {source}")]
    WorkerSpawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Worker thread {worker} panicked")]
    WorkerPanicked { worker: usize },
}

impl DispatchError {
    /// The worker the failure belongs to.
    #[must_use]
    pub const fn worker(&self) -> usize {
        match self {
            Self::WorkerSpawn { worker, .. } | Self::WorkerPanicked { worker } => *worker,
        }
    }
}
