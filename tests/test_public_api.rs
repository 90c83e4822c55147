//! Public API boundary tests
//!
//! Uses only items re-exported from the `cmdpool` crate root.

use cmdpool::{
    CmdpoolError, CommandLine, CommandPool, Config, ConfigError, DispatchError, DispatchOptions,
    Dispatcher, EXIT_CAPTURE_FAILURE, EXIT_SPAWN_FAILURE, EXIT_TIMED_OUT, ErrorCategory, ExitCode,
    FailureKind, OutputFormat, ProcessRunner, RunOutput, Shell, ShellRunner, UserFriendlyError,
    locate_command,
};
use std::time::Duration;

#[test]
fn test_exit_code_sentinels_are_distinct_and_negative() {
    let sentinels = [EXIT_SPAWN_FAILURE, EXIT_CAPTURE_FAILURE, EXIT_TIMED_OUT];
    for code in sentinels {
        assert!(code < -128, "{code} collides with signal codes");
    }
    assert_ne!(EXIT_SPAWN_FAILURE, EXIT_CAPTURE_FAILURE);
    assert_ne!(EXIT_CAPTURE_FAILURE, EXIT_TIMED_OUT);
}

#[test]
fn test_run_output_classification() {
    let timed_out = RunOutput::new("sleep 9", EXIT_TIMED_OUT, "", "killed", 1000.0);
    assert!(!timed_out.success());
    assert_eq!(timed_out.failure_kind(), Some(FailureKind::TimedOut));
    assert!(!bool::from(&timed_out));

    let ok = RunOutput::new("true", 0, "", "", 0.5);
    assert!(ok.success());
    assert_eq!(ok.failure_kind(), None);
}

#[test]
fn test_custom_runner_plugs_into_dispatcher() {
    struct Upper;

    impl ProcessRunner for Upper {
        fn run(&self, command: &str) -> RunOutput {
            RunOutput::new(command, 0, command.to_uppercase(), "", 0.0)
        }
    }

    let report = Dispatcher::new(Upper)
        .dispatch(["a", "b"], &DispatchOptions::new(2))
        .unwrap()
        .into_ordered();
    let outputs: Vec<_> = report.outputs().map(RunOutput::std_out).collect();
    assert_eq!(outputs, vec!["A", "B"]);
}

#[test]
fn test_command_pool_is_usable_directly() {
    let pool = CommandPool::new(["one", "two"]);
    assert_eq!(pool.take_next().map(|p| p.line), Some("one".to_string()));
    assert_eq!(pool.take_next().map(|p| p.index), Some(1));
    assert!(pool.take_next().is_none());
}

#[test]
fn test_config_builder_to_runner() {
    let config = Config::builder()
        .workers(3)
        .timeout(Duration::from_secs(5))
        .output_format(OutputFormat::Json)
        .build()
        .unwrap();
    let runner: ShellRunner = config.shell_runner().unwrap();

    assert_eq!(runner.timeout(), Some(Duration::from_secs(5)));
    assert_eq!(runner.shell(), &Shell::platform_default());
}

#[test]
fn test_errors_carry_exit_codes_and_guidance() {
    let err = CmdpoolError::from(DispatchError::WorkerPanicked { worker: 1 });
    assert_eq!(err.to_exit_code(), ExitCode::INTERNAL);
    assert_eq!(err.category(), ErrorCategory::Concurrency);

    let err = CmdpoolError::from(ConfigError::InvalidValue {
        key: "workers".to_string(),
        value: "0".to_string(),
    });
    assert_eq!(err.to_exit_code(), ExitCode::CLI_ARGS);
    assert!(!err.suggestions().is_empty());
}

#[test]
fn test_command_line_assembly() {
    let line = CommandLine::new("grep").arg("-n").arg("two words").to_line();
    #[cfg(unix)]
    assert_eq!(line, "grep -n 'two words'");
    #[cfg(windows)]
    assert_eq!(line, "grep -n \"two words\"");
}

#[cfg(unix)]
#[test]
fn test_locate_command() {
    assert!(locate_command("sh"));
    assert!(!locate_command("cmdpool-definitely-missing-7d2e"));
}
