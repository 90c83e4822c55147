//! Test doubles for exercising the pool without spawning processes.

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use cmdpool_runner::{ProcessRunner, RunOutput};

/// In-memory writer whose clones share one buffer.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    #[must_use]
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runner whose behaviour is scripted by the command text.
///
/// - `exit:N` exits with status `N`
/// - `sleep:MS` sleeps for `MS` milliseconds, then succeeds
/// - `panic` panics the calling worker
/// - anything else succeeds and echoes the command on stdout
///
/// Anything after the first word of `exit:`/`sleep:` is ignored, so
/// `exit:3 #7` is a distinct command that still exits with 3.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    calls: AtomicUsize,
}

impl ScriptedRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of commands executed so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, command: &str) -> RunOutput {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if command == "panic" {
            panic!("scripted panic");
        }
        if let Some(code) = command.strip_prefix("exit:") {
            let code = leading_number(code).unwrap_or(1);
            return RunOutput::new(command, code, "", format!("exited with {code}"), 0.1);
        }
        if let Some(millis) = command.strip_prefix("sleep:") {
            let millis = leading_number(millis).unwrap_or(0);
            thread::sleep(Duration::from_millis(millis));
            return RunOutput::new(command, 0, "", "", millis as f64);
        }

        RunOutput::new(command, 0, command, "", 0.1)
    }
}

fn leading_number<T: std::str::FromStr>(text: &str) -> Option<T> {
    text.split_whitespace().next()?.parse().ok()
}
