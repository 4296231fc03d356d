#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::NamedTempFile;

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env_remove("CLASS_SCHEDULE__STORAGE__PATH")
        .write_stdin(script.to_string())
        .assert()
}

#[test]
fn cli_schedules_a_monthly_class() {
    let script = "add 1 Boxing\nedit 1\nfreq monthly\nstart 2025-01-01\nend 2025-06-01\nendtype on\nweek 1\nweek -1\nslot add monday 06:00 07:00\nsubmit\nclasses\nquit\n";
    run_cli(script)
        .success()
        .stdout(str_contains("Schedule saved for class 1"))
        .stdout(str_contains("Week 1, Last Week"))
        .stdout(str_contains("Monday 06:00–07:00"));
}

#[test]
fn cli_reports_validation_errors() {
    run_cli("add 1 Pilates\nedit 1\nstart 2025-01-01\nslot add tuesday 10:00 09:00\nsubmit\nquit\n")
        .success()
        .stdout(str_contains("selected_weekdays[0]: start time must be before end time"));
}

#[test]
fn cli_form_commands_need_an_open_form() {
    run_cli("freq daily\nquit\n")
        .success()
        .stdout(str_contains("No open form."));
}

#[test]
fn cli_delete_command_removes_class() {
    run_cli("add 1 Yoga\nadd 2 Spin\ndelete 2\nquit\n")
        .success()
        .stdout(str_contains("Deleted class 2."));
}

#[test]
fn cli_lists_occurrences() {
    let script = "add 1 Yoga\nedit 1\nstart 2025-01-06\nslot add monday 06:00 07:00\nsubmit\noccurrences 1 2025-01-01 2025-01-31\nquit\n";
    run_cli(script)
        .success()
        .stdout(str_contains("4 session(s):"))
        .stdout(str_contains("2025-01-27 Mon 06:00–07:00"));
}

#[test]
fn cli_save_and_load_json_round_trip() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().replace('\\', "\\\\");
    let script = format!(
        "add 1 Persisted\nsave json {path}\nadd 2 Temp\nload json {path}\nclasses\nquit\n"
    );
    let assert = run_cli(&script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("Catalog loaded from"));
    let after_reload = output
        .split("Catalog loaded from")
        .last()
        .unwrap_or_default();
    assert!(after_reload.contains("Persisted"));
    assert!(
        !after_reload.contains("Temp"),
        "temporary class should not appear after reload:\n{after_reload}"
    );
}
