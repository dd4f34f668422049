//! CLI behaviour and exit code tests.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn policydrift() -> Command {
    Command::cargo_bin("policydrift").expect("policydrift binary")
}

const PRISTINE_OBJECTS: &str = r#"
    { "name": "privileged" },
    { "name": "nonroot" },
    { "name": "hostmount-anyuid" },
    { "name": "hostaccess" },
    { "name": "hostnetwork" },
    { "name": "anyuid" },
    { "name": "restricted" }
"#;

/// Writes a baseline whose objects are plain names, and a snapshot built from `objects`.
fn setup(objects: &str) -> TempDir {
    let td = tempfile::tempdir().expect("tempdir");
    fs::write(
        td.path().join("baseline.json"),
        format!(r#"{{ "objects": [ {PRISTINE_OBJECTS} ] }}"#),
    )
    .unwrap();
    fs::write(
        td.path().join("snapshot.json"),
        format!(r#"{{ "objects": [ {objects} ] }}"#),
    )
    .unwrap();
    td
}

fn check(dir: &Path) -> Command {
    let mut cmd = policydrift();
    cmd.current_dir(dir)
        .arg("check")
        .arg("--snapshot")
        .arg("snapshot.json")
        .arg("--baseline")
        .arg("baseline.json");
    cmd
}

#[test]
fn test_check_clean_snapshot_exits_zero() {
    let temp = setup(PRISTINE_OBJECTS);

    check(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS"));

    assert!(temp.path().join("artifacts/policydrift/report.json").exists());
    assert!(temp.path().join("artifacts/policydrift/report.md").exists());
}

#[test]
fn test_check_missing_object_exits_two() {
    let temp = setup(r#"{ "name": "privileged" }, { "name": "restricted" }"#);

    check(temp.path())
        .assert()
        .code(2)
        .stdout(predicate::str::contains("CSD1001"))
        .stdout(predicate::str::contains("scc/anyuid is missing."));
}

#[test]
fn test_check_warning_only_exits_zero() {
    let temp = setup(r#"{ "name": "team-scc" }"#);
    fs::write(
        temp.path().join("baseline.json"),
        r#"{ "objects": [ { "name": "team-scc", "groups": ["system:authenticated"] } ] }"#,
    )
    .unwrap();

    check(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("WARN"))
        .stdout(predicate::str::contains("CSD1003"));
}

#[test]
fn test_check_debug_hidden_unless_requested() {
    let temp = setup(PRISTINE_OBJECTS);
    fs::write(
        temp.path().join("snapshot.json"),
        format!(
            r#"{{ "objects": [ {} ] }}"#,
            PRISTINE_OBJECTS.replace(
                r#"{ "name": "nonroot" }"#,
                r#"{ "name": "nonroot", "users": ["extra"] }"#
            )
        ),
    )
    .unwrap();

    check(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("CSD1004").not())
        .stdout(predicate::str::contains("1 debug finding(s) hidden"));

    check(temp.path())
        .arg("--show-debug")
        .assert()
        .success()
        .stdout(predicate::str::contains("CSD1004"));
}

#[test]
fn test_check_denied_access_is_skipped_and_exits_zero() {
    let temp = setup(PRISTINE_OBJECTS);
    fs::write(
        temp.path().join("snapshot.json"),
        r#"{ "access": [], "objects": [] }"#,
    )
    .unwrap();

    check(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped: not permitted to list"));
}

#[test]
fn test_check_json_format() {
    let temp = setup(PRISTINE_OBJECTS);

    let out = check(temp.path())
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["schema"], "policydrift.report.v1");
    assert_eq!(report["verdict"]["status"], "pass");
}

#[test]
fn test_check_honours_config_file() {
    let temp = setup(r#"{ "name": "privileged" }"#);
    fs::write(
        temp.path().join("policydrift.toml"),
        r#"
[output]
out_dir = "reports"

[diagnostics]
skip = ["SecurityContextConstraints"]
"#,
    )
    .unwrap();

    check(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped by configuration"));
    assert!(temp.path().join("reports/report.json").exists());
}

#[test]
fn test_check_out_dir_flag_overrides_config() {
    let temp = setup(PRISTINE_OBJECTS);
    fs::write(
        temp.path().join("policydrift.toml"),
        "[output]\nout_dir = \"reports\"\n",
    )
    .unwrap();

    check(temp.path())
        .arg("--out-dir")
        .arg("cli-out")
        .assert()
        .success();
    assert!(temp.path().join("cli-out/report.json").exists());
    assert!(!temp.path().join("reports").exists());
}

#[test]
fn test_check_missing_snapshot_is_tool_error() {
    let temp = tempfile::tempdir().unwrap();

    policydrift()
        .current_dir(temp.path())
        .args(["check", "--snapshot", "nope.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nope.json"));
}

#[test]
fn test_check_requires_snapshot() {
    policydrift().arg("check").assert().failure();
}

#[test]
fn test_list_diagnostics_text_and_json() {
    policydrift()
        .arg("list-diagnostics")
        .assert()
        .success()
        .stdout(predicate::str::contains("SecurityContextConstraints"));

    let out = policydrift()
        .args(["list-diagnostics", "--format", "json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let listing: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(listing[0]["name"], "SecurityContextConstraints");
}

#[test]
fn test_explain_known_code() {
    policydrift()
        .args(["explain", "csd1001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CSD1001: Default SCC is missing"))
        .stdout(predicate::str::contains("reconcile-sccs"));
}

#[test]
fn test_explain_unknown_code_fails() {
    policydrift()
        .args(["explain", "CSD4242"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown finding code"));
}
