use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Settings for one dispatch.
///
/// # Example
///
/// ```rust
/// use cmdpool_pool::DispatchOptions;
/// use std::sync::Arc;
/// use std::sync::atomic::AtomicBool;
///
/// let cancel = Arc::new(AtomicBool::new(false));
/// let options = DispatchOptions::new(4)
///     .verbose(true)
///     .cancel_flag(Arc::clone(&cancel));
///
/// assert_eq!(options.workers(), 4);
/// assert!(!options.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    workers: usize,
    verbose: bool,
    cancel: Option<Arc<AtomicBool>>,
}

impl DispatchOptions {
    /// Options for `workers` threads. Zero is clamped to one.
    #[must_use]
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            ..Self::default()
        }
    }

    /// Emit progress notices for every command.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Stop taking new commands once `flag` is set.
    ///
    /// Commands already running finish normally; commands not yet taken
    /// produce no result.
    #[must_use]
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers.max(1)
    }

    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Acquire))
    }
}
