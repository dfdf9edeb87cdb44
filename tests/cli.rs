#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::{tempdir, TempDir};

fn cli(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("swapsched-cli").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("SWAPSCHED_API_URL")
        .env_remove("SWAPSCHED_UTC_OFFSET")
        .env_remove("SWAPSCHED_MAX_SHIFT_HOURS")
        .env("SWAPSCHED_SESSION_FILE", dir.path().join("session.json"));
    cmd
}

fn write_shifts(dir: &TempDir) -> String {
    let path = dir.path().join("shifts.json");
    fs::write(
        &path,
        r#"[{
            "schedule_id": "sch1",
            "staff_id": "s1",
            "shift_date": "2024-01-10",
            "shift_start": "2024-01-10T09:00:00+07:00",
            "shift_end": "2024-01-10T17:00:00+07:00",
            "status": "scheduled"
        }]"#,
    )
    .unwrap();
    path.display().to_string()
}

#[test]
fn normalize_overnight_shift() {
    let dir = tempdir().unwrap();
    cli(&dir)
        .args(["normalize", "--date", "2024-01-10", "--start", "22:00", "--end", "06:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "2024-01-10T22:00:00+07:00 → 2024-01-11T06:00:00+07:00 | overnight: true | 480 min",
        ));
}

#[test]
fn normalize_honours_offset_flag() {
    let dir = tempdir().unwrap();
    cli(&dir)
        .args([
            "--utc-offset",
            "+00:00",
            "normalize",
            "--date",
            "2024-01-10",
            "--start",
            "08:00",
            "--end",
            "12:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-01-10T08:00:00+00:00"));
}

#[test]
fn twenty_four_hour_shift_is_refused() {
    let dir = tempdir().unwrap();
    cli(&dir)
        .args(["normalize", "--date", "2024-01-10", "--start", "09:00", "--end", "09:00"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("overnight: true"))
        .stderr(predicate::str::contains("cannot last more than 16 hours"));
}

#[test]
fn offline_check_reports_conflict_with_code_2() {
    let dir = tempdir().unwrap();
    let shifts = write_shifts(&dir);
    cli(&dir)
        .args([
            "check", "--staff", "s1", "--date", "2024-01-10", "--start", "16:00", "--end",
            "20:00", "--shifts", &shifts,
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("overlapping this time: 09:00-17:00 (#sch1)"));
}

#[test]
fn offline_check_excludes_edited_shift() {
    let dir = tempdir().unwrap();
    let shifts = write_shifts(&dir);
    cli(&dir)
        .args([
            "check", "--staff", "s1", "--date", "2024-01-10", "--start", "10:00", "--end",
            "18:00", "--shifts", &shifts, "--exclude", "sch1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\"shift_end\": \"2024-01-10T18:00:00+07:00\"",
        ));
}

#[test]
fn invalid_fields_exit_with_code_1() {
    let dir = tempdir().unwrap();
    let shifts = write_shifts(&dir);
    cli(&dir)
        .args([
            "check", "--staff", "s1", "--date", "2024-13-40", "--start", "10:00", "--end",
            "18:00", "--shifts", &shifts,
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Shift date: expected YYYY-MM-DD"));
}

#[test]
fn login_then_logout() {
    let dir = tempdir().unwrap();
    cli(&dir)
        .args(["login", "--token", "abc"])
        .assert()
        .success();
    let saved = fs::read_to_string(dir.path().join("session.json")).unwrap();
    assert!(saved.contains("\"token\": \"abc\""));

    cli(&dir).arg("logout").assert().success();
    assert!(!dir.path().join("session.json").exists());
}
