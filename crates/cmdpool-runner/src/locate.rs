//! Host command lookup built on [`ProcessRunner`]

use crate::{CommandLine, ProcessRunner, RunOutput, ShellRunner};

#[cfg(windows)]
const LOOKUP_PROGRAM: &str = "where";

#[cfg(not(windows))]
const LOOKUP_PROGRAM: &str = "which";

/// Whether `name` resolves to an executable on the host.
///
/// Runs `which <name>` (`where <name>` on Windows) through the default
/// [`ShellRunner`] and reports its success.
#[must_use]
pub fn locate_command(name: &str) -> bool {
    locate_command_output(name).success()
}

/// Full output of looking up `name`, so the resolved path (stdout) or the
/// lookup's complaint (stderr) can be recovered.
#[must_use]
pub fn locate_command_output(name: &str) -> RunOutput {
    locate_with(&ShellRunner::new(), name)
}

/// Look up `name` using an arbitrary runner.
pub fn locate_with<R: ProcessRunner + ?Sized>(runner: &R, name: &str) -> RunOutput {
    let line = CommandLine::new(LOOKUP_PROGRAM).arg(name).to_line();
    runner.run(&line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingRunner {
        seen: Mutex<Vec<String>>,
    }

    impl ProcessRunner for RecordingRunner {
        fn run(&self, command: &str) -> RunOutput {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(command.to_string());
            }
            RunOutput::new(command, 1, "", "", 0.0)
        }
    }

    #[test]
    fn test_lookup_goes_through_the_runner() {
        let runner = RecordingRunner {
            seen: Mutex::new(Vec::new()),
        };
        let output = locate_with(&runner, "cargo");

        assert!(!output.success());
        let seen = runner.seen.lock().unwrap();
        assert_eq!(seen.as_slice(), [format!("{LOOKUP_PROGRAM} cargo")]);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_lookup_quotes_hostile_names() {
        let runner = RecordingRunner {
            seen: Mutex::new(Vec::new()),
        };
        let _ = locate_with(&runner, "ls; touch /tmp/pwned");

        let seen = runner.seen.lock().unwrap();
        assert_eq!(seen.as_slice(), ["which 'ls; touch /tmp/pwned'"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_locate_existing_command() {
        assert!(locate_command("ls"));

        let output = locate_command_output("sh");
        assert!(output.success());
        assert!(output.std_out().ends_with("sh"), "path: {}", output.std_out());
    }

    #[cfg(unix)]
    #[test]
    fn test_locate_agrees_with_path_search() {
        for name in ["sh", "ls", "cmdpool_no_such_tool_98765"] {
            assert_eq!(
                locate_command(name),
                which::which(name).is_ok(),
                "disagreement for {name}"
            );
        }
    }

    #[test]
    fn test_locate_fabricated_command() {
        assert!(!locate_command("cmdpool_no_such_tool_98765"));
    }
}
