use std::process::{Child, Command, ExitStatus, Output, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::RunnerError;
use crate::platform;
use crate::process::ProcessRunner;
use crate::run_output::{EXIT_CAPTURE_FAILURE, EXIT_TIMED_OUT, RunOutput};

// ============================================================================
// Shell - The interpreter command lines are handed to
// ============================================================================

/// Interpreter used to run command lines: `program flag <line>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    program: String,
    flag: String,
}

impl Shell {
    /// Create a shell from an interpreter and the flag that makes it execute
    /// its next argument (`sh` + `-c`, `bash` + `-c`, `cmd` + `/C`).
    pub fn new(program: impl Into<String>, flag: impl Into<String>) -> Result<Self, RunnerError> {
        let program = program.into();
        let flag = flag.into();

        if program.trim().is_empty() {
            return Err(RunnerError::ConfigurationInvalid {
                reason: "shell program must not be empty".to_string(),
            });
        }
        if flag.trim().is_empty() {
            return Err(RunnerError::ConfigurationInvalid {
                reason: format!("shell '{program}' needs a command flag such as -c"),
            });
        }

        Ok(Self { program, flag })
    }

    /// `sh -c` on Unix, `cmd /C` on Windows.
    #[must_use]
    pub fn platform_default() -> Self {
        #[cfg(windows)]
        let (program, flag) = ("cmd", "/C");

        #[cfg(not(windows))]
        let (program, flag) = ("sh", "-c");

        Self {
            program: program.to_string(),
            flag: flag.to_string(),
        }
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn flag(&self) -> &str {
        &self.flag
    }

    fn to_command(&self, line: &str) -> Command {
        let mut command = Command::new(&self.program);
        command.arg(&self.flag);

        // cmd.exe does its own parsing; hand it the line untouched
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;

            if self.flag.eq_ignore_ascii_case("/C") {
                command.raw_arg(line);
                return command;
            }
        }

        command.arg(line);
        command
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::platform_default()
    }
}

// ============================================================================
// ShellRunner - Default ProcessRunner
// ============================================================================

/// Runs command lines through a [`Shell`], inheriting the parent's environment
/// and working directory.
///
/// Stdin is connected to the null device. Stdout and stderr are captured
/// through separate pipes and drained concurrently, so a chatty child cannot
/// deadlock on a full pipe.
///
/// Without a timeout a child that never exits blocks [`run`](ProcessRunner::run)
/// forever. With [`with_timeout`](Self::with_timeout) the child is started in
/// its own process group and the whole group is killed at the deadline; the
/// output captured so far is kept and the record gets [`EXIT_TIMED_OUT`].
///
/// # Example
///
/// ```rust,no_run
/// use cmdpool_runner::{ProcessRunner, ShellRunner};
/// use std::time::Duration;
///
/// let runner = ShellRunner::new().with_timeout(Duration::from_secs(30));
/// let output = runner.run("echo hello");
/// assert!(output.success());
/// assert_eq!(output.std_out(), "hello");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
    shell: Shell,
    timeout: Option<Duration>,
}

impl ShellRunner {
    /// Runner using the platform shell and no timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_shell(mut self, shell: Shell) -> Self {
        self.shell = shell;
        self
    }

    /// Kill any command still running after `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn spawn_and_capture(&self, process: &mut Command) -> Result<Captured, RunnerError> {
        let child = process.spawn().map_err(|e| RunnerError::SpawnFailed {
            program: self.shell.program.clone(),
            reason: e.to_string(),
        })?;

        match self.timeout {
            None => {
                let output = child
                    .wait_with_output()
                    .map_err(|e| RunnerError::CaptureFailed {
                        reason: format!("Failed to wait for process: {e}"),
                    })?;
                Ok(Captured::from_output(output))
            }
            Some(limit) => wait_with_timeout(child, limit),
        }
    }
}

impl ProcessRunner for ShellRunner {
    fn run(&self, command: &str) -> RunOutput {
        let mut process = self.shell.to_command(command);
        process
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if self.timeout.is_some() {
            platform::isolate_process_group(&mut process);
        }

        debug!(command = %command, shell = %self.shell.program, "Spawning command");

        let started = Instant::now();
        let captured = self.spawn_and_capture(&mut process);
        let elapsed_millis = started.elapsed().as_secs_f64() * 1000.0;

        let output = match captured {
            Ok(captured) => captured.into_run_output(command, elapsed_millis),
            Err(err) => {
                warn!(command = %command, error = %err, "Command could not be executed");
                RunOutput::new(command, err.exit_code(), "", err.to_string(), elapsed_millis)
            }
        };

        debug!(
            command = %command,
            exit_code = output.exit_code(),
            elapsed_ms = output.elapsed_millis(),
            "Command finished"
        );
        output
    }
}

/// Wait for `child` on a helper thread so the deadline can be enforced from
/// this one. The helper keeps draining both pipes after a kill, which is how
/// partial output survives a timeout.
fn wait_with_timeout(child: Child, limit: Duration) -> Result<Captured, RunnerError> {
    let pid = child.id();
    let (tx, rx) = mpsc::channel();

    let waiter = thread::Builder::new()
        .name(format!("cmdpool-wait-{pid}"))
        .spawn(move || {
            let _ = tx.send(child.wait_with_output());
        });
    let waiter = match waiter {
        Ok(handle) => handle,
        Err(e) => {
            platform::terminate_process_tree(pid);
            return Err(RunnerError::CaptureFailed {
                reason: format!("Failed to start wait thread: {e}"),
            });
        }
    };

    let (result, deadline_hit) = match rx.recv_timeout(limit) {
        Ok(result) => (Ok(result), false),
        Err(RecvTimeoutError::Timeout) => {
            warn!(pid, timeout_ms = %limit.as_millis(), "Command timed out, killing it");
            platform::terminate_process_tree(pid);
            (rx.recv().map_err(|_| ()), true)
        }
        Err(RecvTimeoutError::Disconnected) => (Err(()), false),
    };
    let _ = waiter.join();

    let output = result
        .map_err(|()| RunnerError::CaptureFailed {
            reason: "Process monitoring thread terminated unexpectedly".to_string(),
        })?
        .map_err(|e| RunnerError::CaptureFailed {
            reason: format!("Failed to wait for process: {e}"),
        })?;

    let mut captured = Captured::from_output(output);
    if deadline_hit && captured.termination.was_killed() {
        captured.termination = Termination::TimedOut(limit);
    }
    Ok(captured)
}

// ============================================================================
// Captured - Raw child outcome before it becomes a RunOutput
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Termination {
    Exited(i32),
    Signaled(i32),
    TimedOut(Duration),
    Indeterminate,
}

impl Termination {
    fn of(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self::Exited(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;

            if let Some(signal) = status.signal() {
                return Self::Signaled(signal);
            }
        }

        Self::Indeterminate
    }

    /// Whether this outcome is consistent with our own kill. TerminateProcess
    /// leaves no signal behind on Windows, so any outcome counts there.
    fn was_killed(self) -> bool {
        cfg!(windows) || matches!(self, Self::Signaled(_))
    }
}

#[derive(Debug)]
struct Captured {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    termination: Termination,
}

impl Captured {
    fn from_output(output: Output) -> Self {
        Self {
            termination: Termination::of(output.status),
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }

    fn into_run_output(self, command: &str, elapsed_millis: f64) -> RunOutput {
        let std_out = trimmed(&self.stdout);
        let mut std_err = trimmed(&self.stderr);

        let exit_code = match self.termination {
            Termination::Exited(code) => code,
            Termination::Signaled(signal) => -signal,
            Termination::TimedOut(limit) => {
                append_diagnostic(
                    &mut std_err,
                    &format!(
                        "cmdpool: command timed out after {} ms and was killed",
                        limit.as_millis()
                    ),
                );
                EXIT_TIMED_OUT
            }
            Termination::Indeterminate => {
                append_diagnostic(&mut std_err, "cmdpool: exit status could not be determined");
                EXIT_CAPTURE_FAILURE
            }
        };

        RunOutput::new(command, exit_code, std_out, std_err, elapsed_millis)
    }
}

/// Lossy UTF-8 decode, then strip leading and trailing ASCII whitespace.
fn trimmed(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_matches(|c: char| c.is_ascii_whitespace())
        .to_string()
}

fn append_diagnostic(stream: &mut String, diagnostic: &str) {
    if !stream.is_empty() {
        stream.push('\n');
    }
    stream.push_str(diagnostic);
}
