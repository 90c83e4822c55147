//! Worker pool for batches of shell commands
//!
//! A [`Dispatcher`] seeds a [`CommandPool`] with every submitted command line,
//! starts a fixed number of worker threads, and lets them race for the next
//! command until the pool is empty. Each worker runs its command through a
//! [`ProcessRunner`](cmdpool_runner::ProcessRunner) and appends the result to
//! a shared collection.
//!
//! # Guarantees
//!
//! - Every submitted command is dispensed exactly once and produces exactly
//!   one result (unless the dispatch is cancelled before it is taken).
//! - A failing command never stops the batch.
//! - Result order is completion order, not submission order. Use
//!   [`Dispatcher::dispatch_indexed`] or [`DispatchReport::into_ordered`]
//!   when submission order matters.
//!
//! # Locks
//!
//! Three locks, never held at the same time: the pool cursor, the result
//! collection, and the progress stream used in verbose mode.

mod command_pool;
mod dispatcher;
pub mod error;
mod options;
mod progress;
mod report;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_support;

pub use command_pool::{CommandPool, PendingCommand};
pub use dispatcher::{Dispatcher, dispatch_all};
pub use error::DispatchError;
pub use options::DispatchOptions;
pub use progress::ProgressReporter;
pub use report::{DispatchReport, IndexedOutput};
