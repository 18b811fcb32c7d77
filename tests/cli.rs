#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn init_check_solve_round_trip() {
    let dir = tempdir().unwrap();
    let plan_path = dir.path().join("plan.json");
    let out_dir = dir.path().join("out");

    Command::cargo_bin("shiftsolve-cli")
        .unwrap()
        .args(["init-plan", "--path"])
        .arg(&plan_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("sample plan written"));

    Command::cargo_bin("shiftsolve-cli")
        .unwrap()
        .args(["check", "--plan"])
        .arg(&plan_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("plan ok"));

    Command::cargo_bin("shiftsolve-cli")
        .unwrap()
        .args(["solve", "--plan"])
        .arg(&plan_path)
        .arg("--out-dir")
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("status: OPTIMAL"));

    for file in ["schedule.csv", "vacancies.csv", "totals.csv", "report.json"] {
        assert!(out_dir.join(file).is_file(), "missing {file}");
    }

    let grid = std::fs::read_to_string(out_dir.join("schedule.csv")).unwrap();
    assert!(grid.lines().count() > 1);
    assert!(grid.starts_with("date (OPTIMAL)"));
}

#[test]
fn check_rejects_invalid_plan() {
    let dir = tempdir().unwrap();
    let plan_path = dir.path().join("plan.json");
    std::fs::write(&plan_path, r#"{"period": {"dates": []}, "staff": [], "sites": []}"#).unwrap();

    Command::cargo_bin("shiftsolve-cli")
        .unwrap()
        .args(["check", "--plan"])
        .arg(&plan_path)
        .assert()
        .failure();
}
