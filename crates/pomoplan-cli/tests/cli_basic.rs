//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data dir.

use std::process::Command;

struct Cli {
    dir: tempfile::TempDir,
}

impl Cli {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Run a CLI command and return (stdout, stderr, exit code).
    fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = Command::new(env!("CARGO_BIN_EXE_pomoplan"))
            .args(args)
            .env("POMOPLAN_DATA_DIR", self.dir.path())
            .env_remove("RUST_LOG")
            .output()
            .expect("failed to execute CLI command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);
        (stdout, stderr, code)
    }

    fn ok(&self, args: &[&str]) -> String {
        let (stdout, stderr, code) = self.run(args);
        assert_eq!(code, 0, "{args:?} failed: {stderr}");
        stdout
    }

    fn json(&self, args: &[&str]) -> serde_json::Value {
        serde_json::from_str(&self.ok(args)).expect("output is not JSON")
    }
}

#[test]
fn task_add_and_list() {
    let cli = Cli::new();
    let id = cli.ok(&["task", "add", "Write report", "--category", "Writing", "--count", "2"]);
    let id = id.trim();
    assert!(!id.is_empty());

    let plan = cli.json(&["task", "list", "--json"]);
    assert_eq!(plan["tasks"][0]["task"]["id"], id);
    assert_eq!(plan["tasks"][0]["count"], 2);
    assert_eq!(plan["statistics"]["tasks_count"], 2);

    let text = cli.ok(&["task", "list"]);
    assert!(text.contains("Write report"));
    assert!(text.starts_with('*'));
}

#[test]
fn task_add_rejects_zero_count() {
    let cli = Cli::new();
    let (_, _, code) = cli.run(&["task", "add", "Nope", "--count", "0"]);
    assert_ne!(code, 0);
}

#[test]
fn timer_start_without_work_fails() {
    let cli = Cli::new();
    let (_, stderr, code) = cli.run(&["timer", "start"]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error: Cannot start"), "{stderr}");
}

#[test]
fn timer_lifecycle_archives_work() {
    let cli = Cli::new();
    cli.ok(&["task", "add", "Second"]);
    cli.ok(&["task", "add", "First"]);

    let status = cli.json(&["timer", "start"]);
    assert_eq!(status["phase"]["status"], "active");
    assert_eq!(status["phase"]["task"]["description"], "First");

    let status = cli.json(&["timer", "pause"]);
    assert_eq!(status["phase"]["status"], "paused");
    assert!(status["title"].as_str().unwrap().ends_with("- Pomodoro"));

    let status = cli.json(&["timer", "complete"]);
    assert_eq!(status["phase"]["phase_type"], "short_break");
    assert_eq!(status["phase"]["short_break_count"], 1);

    let archive = cli.json(&["archive", "list", "--json"]);
    assert_eq!(archive["tasks"][0]["task"]["description"], "First");
    assert_eq!(archive["statistics"]["tasks_count"], 1);

    let status = cli.json(&["timer", "complete"]);
    assert_eq!(status["phase"]["phase_type"], "task");
    assert_eq!(status["phase"]["status"], "pending");
    assert_eq!(status["phase"]["task"]["description"], "Second");
}

#[test]
fn timer_counts_time_between_invocations() {
    let cli = Cli::new();
    cli.ok(&["task", "add", "Focus"]);
    let status = cli.json(&["timer", "start"]);
    assert_eq!(status["phase"]["rest_ms"], 1_500_000);

    std::thread::sleep(std::time::Duration::from_millis(2200));
    let status = cli.json(&["timer", "status"]);
    assert_eq!(status["phase"]["status"], "active");
    let rest_ms = status["phase"]["rest_ms"].as_u64().unwrap();
    assert!(rest_ms <= 1_498_000, "rest_ms = {rest_ms}");

    cli.ok(&["timer", "complete"]);
    let archive = cli.json(&["archive", "list", "--json"]);
    let task_time_ms = archive["tasks"][0]["task_time_ms"].as_u64().unwrap();
    assert!(task_time_ms >= 2000, "task_time_ms = {task_time_ms}");
}

#[test]
fn unusable_data_dir_is_reported() {
    let cli = Cli::new();
    let file = cli.dir.path().join("not-a-dir");
    std::fs::write(&file, "").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_pomoplan"))
        .args(["task", "list"])
        .env("POMOPLAN_DATA_DIR", &file)
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("IO error"), "{stderr}");
}

#[test]
fn task_edit_and_reorder() {
    let cli = Cli::new();
    let second = cli.ok(&["task", "add", "Second"]);
    cli.ok(&["task", "add", "First"]);
    cli.ok(&["task", "edit", second.trim(), "--description", "Renamed"]);
    cli.ok(&["task", "reorder", "1", "0"]);

    let plan = cli.json(&["task", "list", "--json"]);
    assert_eq!(plan["tasks"][0]["task"]["description"], "Renamed");
    let status = cli.json(&["timer", "status"]);
    assert_eq!(status["phase"]["task"]["description"], "Renamed");

    let (_, _, code) = cli.run(&["task", "reorder", "0", "9"]);
    assert_eq!(code, 1);
}

#[test]
fn archive_delete_out_of_range_fails() {
    let cli = Cli::new();
    let (_, stderr, code) = cli.run(&["archive", "delete", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("not found"), "{stderr}");
}

#[test]
fn config_get_and_set() {
    let cli = Cli::new();
    assert_eq!(cli.ok(&["config", "get", "schedule.focus_duration"]).trim(), "25");
    cli.ok(&["config", "set", "schedule.focus_duration", "50"]);
    assert_eq!(cli.ok(&["config", "get", "schedule.focus_duration"]).trim(), "50");

    let (_, _, code) = cli.run(&["config", "set", "schedule.unknown", "1"]);
    assert_eq!(code, 1);

    cli.ok(&["task", "add", "Long one"]);
    let status = cli.json(&["timer", "status"]);
    assert_eq!(status["phase"]["rest_ms"], 50 * 60_000);
}

#[test]
fn theme_toggles_and_persists() {
    let cli = Cli::new();
    assert_eq!(cli.ok(&["theme"]).trim(), "dark");
    assert_eq!(cli.ok(&["theme"]).trim(), "light");
    assert_eq!(cli.ok(&["theme", "dark"]).trim(), "dark");
    let (_, _, code) = cli.run(&["theme", "blue"]);
    assert_ne!(code, 0);
}

#[test]
fn timer_run_returns_when_work_waits() {
    let cli = Cli::new();
    cli.ok(&["task", "add", "Pending"]);
    let out = cli.ok(&["timer", "run"]);
    assert!(out.contains("waiting: Pending"), "{out}");
}
