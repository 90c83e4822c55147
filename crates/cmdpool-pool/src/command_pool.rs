use std::sync::{Mutex, MutexGuard, PoisonError};

/// A command handed out by [`CommandPool::take_next`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCommand {
    /// Position of the command in the submitted batch.
    pub index: usize,
    /// The command line, exactly as submitted.
    pub line: String,
}

/// Thread-safe queue of pending command lines.
///
/// Every command is returned by [`take_next`](Self::take_next) to exactly one
/// caller, exactly once. Once `take_next` returns `None` it returns `None`
/// forever. Commands are never re-issued, whatever happens to them after they
/// were taken.
#[derive(Debug)]
pub struct CommandPool {
    state: Mutex<PoolState>,
}

#[derive(Debug)]
struct PoolState {
    commands: Vec<String>,
    cursor: usize,
}

impl CommandPool {
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            state: Mutex::new(PoolState {
                commands: commands.into_iter().map(Into::into).collect(),
                cursor: 0,
            }),
        }
    }

    /// Take the next pending command, or `None` once the pool is exhausted.
    pub fn take_next(&self) -> Option<PendingCommand> {
        let mut state = self.lock();
        let index = state.cursor;
        let slot = state.commands.get_mut(index)?;
        let line = std::mem::take(slot);
        state.cursor += 1;
        Some(PendingCommand { index, line })
    }

    /// Exhaust the pool without dispensing what is left.
    ///
    /// Returns how many commands were discarded.
    pub fn close(&self) -> usize {
        let mut state = self.lock();
        let discarded = state.commands.len().saturating_sub(state.cursor);
        state.cursor = state.commands.len();
        discarded
    }

    /// Total number of commands the pool was seeded with.
    pub fn len(&self) -> usize {
        self.lock().commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Commands not yet dispensed.
    pub fn remaining(&self) -> usize {
        let state = self.lock();
        state.commands.len().saturating_sub(state.cursor)
    }

    // The critical sections cannot panic, so a poisoned lock still holds a
    // consistent cursor.
    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
