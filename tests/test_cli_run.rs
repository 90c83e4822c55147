//! End-to-end tests for the `cmdpool` binary.
//!
//! Each test runs in its own temp directory with a `.git` marker so config
//! discovery never sees the host's files.

use assert_cmd::assert::OutputAssertExt;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join(".git")).unwrap();
    temp
}

fn cmdpool(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cmdpool"));
    cmd.current_dir(dir);
    cmd.stdin(Stdio::null());
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_commands(dir: &Path, lines: &str) -> std::path::PathBuf {
    let path = dir.join("commands.txt");
    fs::write(&path, lines).unwrap();
    path
}

#[test]
fn version_output() {
    let temp = workspace();
    cmdpool(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cmdpool"));
}

#[test]
fn missing_subcommand_is_usage_error() {
    let temp = workspace();
    cmdpool(temp.path()).assert().code(2);
}

#[test]
fn debug_lists_commands_without_running_them() {
    let temp = workspace();
    let marker = temp.path().join("ran");
    let file = write_commands(
        temp.path(),
        &format!("# setup\ntouch {}\n\necho second\n", marker.display()),
    );

    cmdpool(temp.path())
        .args(["run", "--debug"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "touch {}\necho second\n",
            marker.display()
        )));

    assert!(!marker.exists());
}

#[test]
fn unreadable_command_file_is_reported() {
    let temp = workspace();
    cmdpool(temp.path())
        .args(["run", "does-not-exist.txt"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Could not read commands from does-not-exist.txt"))
        .stderr(predicate::str::contains("Suggestions:"));
}

#[test]
fn invalid_config_file_is_reported() {
    let temp = workspace();
    fs::create_dir(temp.path().join(".cmdpool")).unwrap();
    fs::write(
        temp.path().join(".cmdpool").join("config.toml"),
        "[defaults]\nworkers = 0\n",
    )
    .unwrap();

    cmdpool(temp.path())
        .arg("config")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration 'workers' has invalid value"));
}

#[test]
fn config_shows_sources() {
    let temp = workspace();
    fs::create_dir(temp.path().join(".cmdpool")).unwrap();
    fs::write(
        temp.path().join(".cmdpool").join("config.toml"),
        "[defaults]\nworkers = 5\n",
    )
    .unwrap();

    cmdpool(temp.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("= 5  (config file ("))
        .stdout(predicate::str::contains("(defaults)"));
}

#[test]
fn empty_command_list_succeeds() {
    let temp = workspace();
    let file = write_commands(temp.path(), "# nothing to do\n\n");

    cmdpool(temp.path())
        .arg("run")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("0 commands: 0 succeeded, 0 failed"));
}

#[cfg(unix)]
mod unix {
    use super::*;

    #[test]
    fn all_successful_commands_exit_zero() {
        let temp = workspace();
        let file = write_commands(temp.path(), "echo alpha\necho beta\ntrue\n");

        cmdpool(temp.path())
            .args(["run", "--workers", "2"])
            .arg(&file)
            .assert()
            .success()
            .stdout(predicate::str::contains("[ok] exit 0"))
            .stdout(predicate::str::contains("  stdout | alpha"))
            .stdout(predicate::str::contains("  stdout | beta"))
            .stdout(predicate::str::contains("3 commands: 3 succeeded, 0 failed"));
    }

    #[test]
    fn one_failure_sets_failure_exit_code_but_batch_completes() {
        let temp = workspace();
        let file = write_commands(temp.path(), "false\necho still-ran\nexit 7\n");

        cmdpool(temp.path())
            .args(["run", "-j", "1"])
            .arg(&file)
            .assert()
            .code(3)
            .stdout(predicate::str::contains("[FAILED] exit 7"))
            .stdout(predicate::str::contains("still-ran"))
            .stdout(predicate::str::contains("3 commands: 1 succeeded, 2 failed"));
    }

    #[test]
    fn commands_read_from_stdin() {
        let temp = workspace();
        let mut cmd = assert_cmd::Command::from_std(cmdpool(temp.path()));
        cmd.arg("run")
            .write_stdin("echo from-stdin\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("from-stdin"));
    }

    #[test]
    fn json_report_in_submission_order() {
        let temp = workspace();
        let file = write_commands(
            temp.path(),
            "sleep 0.3; echo slow\necho fast\necho 'to stderr' >&2; exit 1\n",
        );

        let output = cmdpool(temp.path())
            .args(["run", "--format", "json", "--ordered", "-j", "3"])
            .arg(&file)
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(3));

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["submitted"], 3);
        assert_eq!(report["succeeded"], 2);
        assert_eq!(report["failed"], 1);
        assert_eq!(report["workers"], 3);

        let results = report["results"].as_array().unwrap();
        let indices: Vec<_> = results.iter().map(|r| r["index"].as_u64().unwrap()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(results[0]["std_out"], "slow");
        assert_eq!(results[1]["std_out"], "fast");
        assert_eq!(results[2]["std_err"], "to stderr");
        assert_eq!(results[2]["success"], false);
        assert_eq!(results[2]["exit_code"], 1);
    }

    #[test]
    fn timeout_kills_long_commands() {
        let temp = workspace();
        let file = write_commands(temp.path(), "echo started; sleep 30\necho quick\n");

        assert_cmd::Command::from_std(cmdpool(temp.path()))
            .args(["run", "--timeout", "1", "-j", "2"])
            .arg(&file)
            .timeout(std::time::Duration::from_secs(20))
            .assert()
            .code(3)
            .stdout(predicate::str::contains("exit -1003"))
            .stdout(predicate::str::contains("timed out"))
            .stdout(predicate::str::contains("  stdout | started"))
            .stdout(predicate::str::contains("  stdout | quick"));
    }

    #[test]
    fn verbose_reports_worker_progress() {
        let temp = workspace();
        let file = write_commands(temp.path(), "echo one\necho two\n");

        cmdpool(temp.path())
            .args(["run", "--verbose", "-j", "2"])
            .arg(&file)
            .assert()
            .success()
            .stderr(predicate::str::contains(": running: echo one"))
            .stderr(predicate::str::contains(": recording result: echo two"))
            .stderr(predicate::str::contains("no commands left"));
    }

    #[test]
    fn configured_shell_is_used() {
        let temp = workspace();
        fs::create_dir(temp.path().join(".cmdpool")).unwrap();
        fs::write(
            temp.path().join(".cmdpool").join("config.toml"),
            "[shell]\nprogram = \"/bin/sh\"\nflag = \"-c\"\n",
        )
        .unwrap();
        let file = write_commands(temp.path(), "echo via-config\n");

        cmdpool(temp.path())
            .arg("run")
            .arg(&file)
            .assert()
            .success()
            .stdout(predicate::str::contains("via-config"));
    }

    #[test]
    fn which_finds_sh() {
        let temp = workspace();
        cmdpool(temp.path())
            .args(["which", "sh"])
            .assert()
            .success()
            .stdout(predicate::str::contains("sh"));
    }

    #[test]
    fn which_full_prints_json() {
        let temp = workspace();
        let output = cmdpool(temp.path())
            .args(["which", "sh", "--full"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(value["class"], "cmdpool::RunOutput");
        assert_eq!(value["success"], true);
    }

    #[test]
    fn which_missing_command_exits_not_found() {
        let temp = workspace();
        cmdpool(temp.path())
            .args(["which", "cmdpool-no-such-program-4f1c"])
            .assert()
            .code(4)
            .stderr(predicate::str::contains("not found"));
    }
}
