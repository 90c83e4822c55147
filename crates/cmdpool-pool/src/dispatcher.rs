use std::io;
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Instant;

use chrono::Utc;
use cmdpool_runner::{ProcessRunner, RunOutput, ShellRunner};
use tracing::{debug, info, warn};

use crate::command_pool::CommandPool;
use crate::error::DispatchError;
use crate::options::DispatchOptions;
use crate::progress::ProgressReporter;
use crate::report::{DispatchReport, IndexedOutput};

/// Run `commands` through the platform shell on `workers` threads.
///
/// Shorthand for [`Dispatcher::dispatch_all`] with a default [`ShellRunner`]
/// and progress notices on stderr.
///
/// # Example
///
/// ```rust,no_run
/// let results = cmdpool_pool::dispatch_all(["echo a", "echo b", "false"], 2, false)?;
/// assert_eq!(results.len(), 3);
/// # Ok::<(), cmdpool_pool::DispatchError>(())
/// ```
pub fn dispatch_all<I, S>(
    commands: I,
    workers: usize,
    verbose: bool,
) -> Result<Vec<RunOutput>, DispatchError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Dispatcher::new(ShellRunner::new()).dispatch_all(commands, workers, verbose)
}

/// Drains a batch of commands across a fixed number of worker threads.
///
/// Each dispatch builds its own [`CommandPool`] and result collection, so a
/// `Dispatcher` can be reused, including from several threads at once.
#[derive(Debug)]
pub struct Dispatcher<R = ShellRunner> {
    runner: R,
    reporter: ProgressReporter,
}

impl<R: ProcessRunner + Sync> Dispatcher<R> {
    /// Dispatcher running commands through `runner`, reporting verbose
    /// progress on stderr.
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            reporter: ProgressReporter::stderr(),
        }
    }

    /// Send verbose progress notices to `reporter` instead of stderr.
    #[must_use]
    pub fn with_reporter(mut self, reporter: ProgressReporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run every command and return the results in completion order.
    pub fn dispatch_all<I, S>(
        &self,
        commands: I,
        workers: usize,
        verbose: bool,
    ) -> Result<Vec<RunOutput>, DispatchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options = DispatchOptions::new(workers).verbose(verbose);
        let results = self.dispatch_indexed(commands, &options)?;
        Ok(results.into_iter().map(|r| r.output).collect())
    }

    /// Run every command and return the results tagged with their submission
    /// index, in completion order.
    pub fn dispatch_indexed<I, S>(
        &self,
        commands: I,
        options: &DispatchOptions,
    ) -> Result<Vec<IndexedOutput>, DispatchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pool = CommandPool::new(commands);
        self.drain(&pool, options)
    }

    /// Run every command and summarize the outcome.
    pub fn dispatch<I, S>(
        &self,
        commands: I,
        options: &DispatchOptions,
    ) -> Result<DispatchReport, DispatchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pool = CommandPool::new(commands);
        let submitted = pool.len();
        let started_at = Utc::now();
        let clock = Instant::now();

        let results = self.drain(&pool, options)?;

        let report = DispatchReport::new(
            started_at,
            Utc::now(),
            options.workers(),
            submitted,
            clock.elapsed().as_secs_f64() * 1000.0,
            results,
        );
        info!(
            submitted = report.submitted,
            succeeded = report.succeeded,
            failed = report.failed,
            not_run = report.not_run(),
            elapsed_ms = report.elapsed_millis,
            "Dispatch finished"
        );
        Ok(report)
    }

    fn drain(
        &self,
        pool: &CommandPool,
        options: &DispatchOptions,
    ) -> Result<Vec<IndexedOutput>, DispatchError> {
        if pool.is_empty() {
            debug!("No commands submitted, nothing to dispatch");
            return Ok(Vec::new());
        }

        // Workers beyond the batch size would only observe exhaustion.
        let workers = options.workers().min(pool.len());
        info!(
            commands = pool.len(),
            requested = options.workers(),
            workers,
            "Dispatching commands"
        );

        let results = Mutex::new(Vec::with_capacity(pool.len()));
        let collected = &results;

        thread::scope(|scope| {
            let handles = start_workers(workers, |worker| {
                thread::Builder::new()
                    .name(format!("cmdpool-worker-{worker}"))
                    .spawn_scoped(scope, move || self.work(worker, pool, collected, options))
            })
            .inspect_err(|_| {
                pool.close();
            })?;

            let mut failure = None;
            for (worker, handle) in handles {
                if handle.join().is_err() {
                    warn!(worker, "Worker thread panicked");
                    pool.close();
                    failure.get_or_insert(DispatchError::WorkerPanicked { worker });
                }
            }

            failure.map_or(Ok(()), Err)
        })?;

        Ok(results.into_inner().unwrap_or_else(PoisonError::into_inner))
    }

    fn work(
        &self,
        worker: usize,
        pool: &CommandPool,
        results: &Mutex<Vec<IndexedOutput>>,
        options: &DispatchOptions,
    ) {
        let verbose = options.is_verbose();
        let mut completed = 0usize;

        loop {
            if options.is_cancelled() {
                debug!(worker, "Dispatch cancelled, worker stopping");
                break;
            }
            let Some(pending) = pool.take_next() else {
                break;
            };

            if verbose {
                self.reporter.starting(worker, &pending.line);
            }
            debug!(worker, index = pending.index, command = %pending.line, "Running command");

            let output = self.runner.run(&pending.line);

            if verbose {
                self.reporter.finished(worker, &output);
                self.reporter.recorded(worker, &pending.line);
            }
            if !output.success() {
                debug!(
                    worker,
                    command = %pending.line,
                    exit_code = output.exit_code(),
                    "Command failed"
                );
            }

            results
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(IndexedOutput {
                    index: pending.index,
                    output,
                });
            completed += 1;
        }

        if verbose {
            self.reporter.stopped(worker, completed);
        }
    }
}

/// Start up to `count` workers through `spawn`.
///
/// A worker that fails to start after at least one other is running only
/// shrinks the pool; the running workers still drain every command. Fails
/// only when the first worker cannot start.
fn start_workers<H>(
    count: usize,
    mut spawn: impl FnMut(usize) -> io::Result<H>,
) -> Result<Vec<(usize, H)>, DispatchError> {
    let mut handles = Vec::with_capacity(count);
    for worker in 0..count {
        match spawn(worker) {
            Ok(handle) => handles.push((worker, handle)),
            Err(source) if handles.is_empty() => {
                warn!(worker, error = %source, "Failed to start worker thread");
                return Err(DispatchError::WorkerSpawn { worker, source });
            }
            Err(source) => {
                warn!(
                    worker,
                    running = handles.len(),
                    error = %source,
                    "Failed to start worker thread, continuing with fewer workers"
                );
                break;
            }
        }
    }
    Ok(handles)
}

impl Default for Dispatcher<ShellRunner> {
    fn default() -> Self {
        Self::new(ShellRunner::new())
    }
}
