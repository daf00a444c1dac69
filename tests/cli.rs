//! Runs the `startup-gate` binary and checks its exit status and stdout.

use std::fs;
use std::net::{SocketAddr, TcpListener};
use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;

fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

fn run_gate(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_startup-gate"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("RUST_BACKTRACE")
        .output()
        .unwrap()
}

fn write_unreachable_config(dir: &Path) -> String {
    let addr = closed_port();
    let path = dir.join("gate.toml");
    fs::write(
        &path,
        format!(
            "[database]\nhost = \"{}\"\nport = {}\nconnect_timeout_secs = 1\n\n\
             [boot]\nmax_attempts = 2\ndelay_secs = 0\n",
            addr.ip(),
            addr.port()
        ),
    )
    .unwrap();
    path.to_string_lossy().into_owned()
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_unreachable_database_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_unreachable_config(dir.path());

    let output = run_gate(dir.path(), &["--config", &config, "wait-for-db"]);
    let stdout = stdout_of(&output);

    assert!(output.status.success(), "status: {:?}", output.status);
    assert!(
        stdout.contains("boot: database unreachable after 2 attempt(s), skipped."),
        "stdout: {}",
        stdout
    );
    assert!(stdout.contains("Attempt failed, retrying"), "stdout: {}", stdout);
    assert!(!stdout.contains('\u{1b}'), "ANSI escapes in piped output: {}", stdout);
}

#[test]
fn test_invalid_config_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[boot]\nmax_attempts = 0\n").unwrap();

    let output = run_gate(
        dir.path(),
        &["--config", path.to_str().unwrap(), "wait-for-db"],
    );
    let stdout = stdout_of(&output);

    assert!(output.status.success(), "status: {:?}", output.status);
    assert!(
        stdout.contains("boot: not run, skipped. Reason: Validation failed: boot.max_attempts"),
        "stdout: {}",
        stdout
    );
}

#[test]
fn test_missing_migration_command_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_unreachable_config(dir.path());

    let output = run_gate(dir.path(), &["--config", &config, "migrate-safe", "--force"]);

    assert!(output.status.success(), "status: {:?}", output.status);
    assert!(stdout_of(&output).contains("migrate: not run, skipped. Reason: no migration command"));
}

#[test]
fn test_json_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_unreachable_config(dir.path());

    let output = run_gate(dir.path(), &["--config", &config, "--json", "wait-for-db"]);
    assert!(output.status.success(), "status: {:?}", output.status);

    let stdout = stdout_of(&output);
    let report: Value = stdout
        .lines()
        .filter(|line| line.starts_with('{'))
        .filter_map(|line| serde_json::from_str::<Value>(line).ok())
        .find(|value| value.get("stage").is_some())
        .unwrap_or_else(|| panic!("no JSON outcome in stdout: {}", stdout));

    assert_eq!(report["stage"], "boot");
    assert_eq!(report["outcome"]["status"], "skipped_after_exhaustion");
    assert_eq!(report["outcome"]["attempts"], 2);
    assert_eq!(report["outcome"]["fault_kind"], "connectivity");
}

#[test]
fn test_bad_arguments_exit_zero() {
    let dir = tempfile::tempdir().unwrap();

    for args in [
        &["wait-for-db", "--max-attempts", "0"][..],
        &["wait-for-db", "--bogus"][..],
        &["no-such-command"][..],
    ] {
        let output = run_gate(dir.path(), args);
        assert!(output.status.success(), "{:?} exited with {:?}", args, output.status);
        assert!(!output.stderr.is_empty(), "{:?} printed no usage error", args);
    }
}

#[test]
fn test_help_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_gate(dir.path(), &["--help"]);

    assert!(output.status.success());
    assert!(stdout_of(&output).contains("migrate-safe"));
}
