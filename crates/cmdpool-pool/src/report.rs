use chrono::{DateTime, Utc};
use cmdpool_runner::RunOutput;
use serde::Serialize;

/// A result paired with the submission index of its command.
///
/// The index disambiguates textually identical commands submitted more than
/// once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexedOutput {
    pub index: usize,
    #[serde(flatten)]
    pub output: RunOutput,
}

/// Summary of a finished dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Worker threads used, after clamping.
    pub workers: usize,
    /// Commands in the submitted batch.
    pub submitted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed_millis: f64,
    /// Results in completion order unless [`into_ordered`](Self::into_ordered)
    /// was applied.
    pub results: Vec<IndexedOutput>,
}

impl DispatchReport {
    pub(crate) fn new(
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        workers: usize,
        submitted: usize,
        elapsed_millis: f64,
        results: Vec<IndexedOutput>,
    ) -> Self {
        let succeeded = results.iter().filter(|r| r.output.success()).count();
        Self {
            started_at,
            finished_at,
            workers,
            submitted,
            succeeded,
            failed: results.len() - succeeded,
            elapsed_millis,
            results,
        }
    }

    /// Every submitted command ran and succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0 && self.results.len() == self.submitted
    }

    /// Commands that were never started (cancelled dispatch).
    #[must_use]
    pub fn not_run(&self) -> usize {
        self.submitted.saturating_sub(self.results.len())
    }

    /// Sort results back into submission order.
    #[must_use]
    pub fn into_ordered(mut self) -> Self {
        self.results.sort_by_key(|r| r.index);
        self
    }

    pub fn outputs(&self) -> impl Iterator<Item = &RunOutput> {
        self.results.iter().map(|r| &r.output)
    }

    #[must_use]
    pub fn into_outputs(self) -> Vec<RunOutput> {
        self.results.into_iter().map(|r| r.output).collect()
    }
}
