//! Integration tests driving the refsync binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn refsync() -> Command {
    Command::cargo_bin("refsync").unwrap()
}

#[test]
fn test_updates_reference_block() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("ref1.txt"), "ref1").unwrap();
    fs::write(dir.path().join("a.cs"), "// ref:ref1.txt\n// endref\n").unwrap();

    refsync()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("updated"));

    assert_eq!(
        fs::read_to_string(dir.path().join("a.cs")).unwrap(),
        "// ref:ref1.txt\nref1\n// endref\n"
    );
}

#[test]
fn test_second_run_reports_up_to_date() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("ref1.txt"), "ref1").unwrap();
    fs::write(dir.path().join("a.yml"), "# ref:ref1.txt\n# endref\n").unwrap();

    refsync().arg(dir.path()).assert().success();
    refsync()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date"));
}

#[test]
fn test_missing_reference_fails_with_nonzero_exit() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.yml"), "# ref:missing.txt\n# endref\n").unwrap();

    refsync()
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.txt"));
}

#[test]
fn test_failure_in_one_file_still_updates_others() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("ref1.txt"), "ref1").unwrap();
    fs::write(dir.path().join("good.yml"), "# ref:ref1.txt\n# endref\n").unwrap();
    fs::write(dir.path().join("bad.yml"), "# ref:missing.txt\n# endref\n").unwrap();

    refsync().arg(dir.path()).assert().failure();
    assert_eq!(
        fs::read_to_string(dir.path().join("good.yml")).unwrap(),
        "# ref:ref1.txt\nref1\n# endref\n"
    );
}

#[test]
fn test_no_recurse_skips_subfolders() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/ref1.txt"), "ref1").unwrap();
    fs::write(dir.path().join("sub/a.yml"), "# ref:ref1.txt\n# endref\n").unwrap();

    refsync()
        .arg("--recurse")
        .arg("false")
        .arg(dir.path())
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dir.path().join("sub/a.yml")).unwrap(),
        "# ref:ref1.txt\n# endref\n"
    );
}

#[test]
fn test_end_of_line_option_forces_crlf() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("ref1.txt"), "a\nb\n").unwrap();
    fs::write(dir.path().join("a.yml"), "# ref:ref1.txt\n# endref\n").unwrap();

    refsync()
        .arg("--end-of-line")
        .arg("crlf")
        .arg(dir.path())
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dir.path().join("a.yml")).unwrap(),
        "# ref:ref1.txt\na\r\nb\n# endref\n"
    );
}

#[test]
fn test_manifest_copies_whole_file() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("refs")).unwrap();
    fs::write(dir.path().join("refs/LICENSE.txt"), "dummy").unwrap();
    fs::write(
        dir.path().join("FileReferences.json"),
        r#"{"references": {"LICENSE.txt": {"ref": "./refs/LICENSE.txt"}}}"#,
    )
    .unwrap();

    refsync().arg(dir.path()).assert().success();
    assert_eq!(
        fs::read_to_string(dir.path().join("LICENSE.txt")).unwrap(),
        "dummy"
    );
}

#[test]
fn test_requires_at_least_one_path() {
    refsync().assert().failure();
}
