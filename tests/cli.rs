use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

const DATA: &str = r#"[{"age":"0-4","male":1000,"female":900},{"age":"5-9","male":800,"female":1200}]"#;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("pyramid").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("render"));
}

#[test]
fn render_writes_both_files_and_saves_state() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("rows.json");
    fs::write(&data, DATA).unwrap();
    let state = dir.path().join("state.json");

    let mut cmd = Command::cargo_bin("pyramid").unwrap();
    cmd.arg("--state")
        .arg(&state)
        .args(["render", "--title", "Population 2020", "--source", "UN", "--data"])
        .arg(&data)
        .arg("--out-dir")
        .arg(dir.path());
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Wrote"));

    assert!(dir.path().join("chart_Population 2020.svg").is_file());
    assert!(dir.path().join("chart_Population 2020.jpg").is_file());

    let mut show = Command::cargo_bin("pyramid").unwrap();
    show.arg("--state").arg(&state).arg("state");
    show.assert()
        .success()
        .stdout(predicate::str::contains("Population 2020"));

    let again = dir.path().join("again.svg");
    let mut last = Command::cargo_bin("pyramid").unwrap();
    last.arg("--state").arg(&state).arg("last").arg("--svg").arg(&again);
    last.assert().success();
    let svg = fs::read_to_string(&again).unwrap();
    assert!(svg.contains("Source: UN"));
}

#[test]
fn render_reads_csv() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("rows.csv");
    fs::write(&data, "age,male,female\n0-4,1000,900\n5-9,800,1200\n").unwrap();
    let out = dir.path().join("out.svg");

    let mut cmd = Command::cargo_bin("pyramid").unwrap();
    cmd.arg("--state")
        .arg(dir.path().join("state.json"))
        .args(["render", "--no-save", "--title", "csv", "--data"])
        .arg(&data)
        .arg("--svg")
        .arg(&out);
    cmd.assert().success();
    assert!(fs::read_to_string(&out).unwrap().contains("1.20"));
    assert!(!dir.path().join("state.json").exists());
}

#[test]
fn empty_rows_fail_without_saving() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("rows.json");
    fs::write(&data, "[]").unwrap();
    let state = dir.path().join("state.json");

    let mut cmd = Command::cargo_bin("pyramid").unwrap();
    cmd.arg("--state")
        .arg(&state)
        .args(["render", "--title", "t", "--data"])
        .arg(&data)
        .arg("--out-dir")
        .arg(dir.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no rows"));
    assert!(!state.exists());
}

#[test]
fn last_without_state_fails() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("pyramid").unwrap();
    cmd.arg("--state")
        .arg(dir.path().join("state.json"))
        .arg("last");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no saved chart"));
}

#[test]
fn last_keeps_custom_side_labels() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("rows.json");
    fs::write(&data, DATA).unwrap();
    let state = dir.path().join("state.json");

    let mut cmd = Command::cargo_bin("pyramid").unwrap();
    cmd.arg("--state")
        .arg(&state)
        .args(["render", "--title", "t", "--side-a", "Urban", "--side-b", "Rural", "--data"])
        .arg(&data)
        .arg("--svg")
        .arg(dir.path().join("first.svg"));
    cmd.assert().success();

    let again = dir.path().join("again.svg");
    let mut last = Command::cargo_bin("pyramid").unwrap();
    last.arg("--state").arg(&state).arg("last").arg("--svg").arg(&again);
    last.assert().success();
    let svg = fs::read_to_string(&again).unwrap();
    assert!(svg.contains("Urban surplus"));
    assert!(svg.contains("Rural"));
}
