use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use cmdpool_runner::RunOutput;

/// Serialized writer for verbose progress notices.
///
/// Each notice is written and flushed under one lock, so lines from
/// different workers never interleave. Write errors are ignored: progress
/// output must not affect the dispatch.
pub struct ProgressReporter {
    sink: Mutex<Box<dyn Write + Send>>,
}

impl ProgressReporter {
    /// Report to `writer`.
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Mutex::new(Box::new(writer)),
        }
    }

    /// Report to the process's stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    pub fn starting(&self, worker: usize, command: &str) {
        self.emit(format_args!("worker {worker}: running: {command}"));
    }

    pub fn finished(&self, worker: usize, output: &RunOutput) {
        self.emit(format_args!(
            "worker {worker}: finished (exit {}, {:.1} ms): {}",
            output.exit_code(),
            output.elapsed_millis(),
            output.command()
        ));
    }

    pub fn recorded(&self, worker: usize, command: &str) {
        self.emit(format_args!("worker {worker}: recording result: {command}"));
    }

    pub fn stopped(&self, worker: usize, completed: usize) {
        self.emit(format_args!(
            "worker {worker}: no commands left, stopping after {completed}"
        ));
    }

    fn emit(&self, notice: fmt::Arguments<'_>) {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(sink, "{notice}");
        let _ = sink.flush();
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::stderr()
    }
}

impl fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressReporter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::SharedBuffer;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_notice_format() {
        let buffer = SharedBuffer::default();
        let reporter = ProgressReporter::new(buffer.clone());

        reporter.starting(2, "echo hi");
        reporter.finished(2, &RunOutput::new("echo hi", 0, "hi", "", 1.5));
        reporter.recorded(2, "echo hi");
        reporter.stopped(2, 1);

        assert_eq!(
            buffer.contents(),
            "worker 2: running: echo hi\n\
             worker 2: finished (exit 0, 1.5 ms): echo hi\n\
             worker 2: recording result: echo hi\n\
             worker 2: no commands left, stopping after 1\n"
        );
    }

    #[test]
    fn test_concurrent_notices_do_not_interleave() {
        let buffer = SharedBuffer::default();
        let reporter = Arc::new(ProgressReporter::new(buffer.clone()));

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let reporter = Arc::clone(&reporter);
                thread::spawn(move || {
                    for i in 0..200 {
                        reporter.starting(worker, &format!("command-{worker}-{i}"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let contents = buffer.contents();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 8 * 200);
        for line in lines {
            let (prefix, command) = line.split_once(": running: ").unwrap();
            let worker = prefix.strip_prefix("worker ").unwrap();
            assert!(
                command.starts_with(&format!("command-{worker}-")),
                "garbled line: {line}"
            );
        }
    }
}
