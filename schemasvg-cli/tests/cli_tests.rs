//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

/// Build command for the schemasvg binary (found in target/debug when run via cargo test).
fn schemasvg_cli() -> Command {
    cargo_bin_cmd!("schemasvg")
}

#[test]
fn test_cli_help() {
    let mut cmd = schemasvg_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("SVG"));
}

#[test]
fn test_cli_version() {
    let mut cmd = schemasvg_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_convert_writes_svg() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("simple.sch");
    fs::write(&input, "N 0 0 100 100 4\n").unwrap();

    let mut cmd = schemasvg_cli();
    cmd.arg("convert").arg(&input);
    cmd.assert().success();

    let svg = fs::read_to_string(dir.path().join("simple.svg")).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("<line"));
}

#[test]
fn test_cli_convert_explicit_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("simple.sch");
    let output = dir.path().join("out").with_extension("svg");
    fs::write(&input, "N 0 0 100 100 4\n").unwrap();

    let mut cmd = schemasvg_cli();
    cmd.arg("convert").arg(&input).arg("-o").arg(&output);
    cmd.assert().success();

    assert!(output.is_file());
}

#[test]
fn test_cli_convert_missing_file() {
    let mut cmd = schemasvg_cli();

    cmd.arg("convert").arg("does_not_exist.sch");
    cmd.assert().failure();
}

#[test]
fn test_cli_detect_geda() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("simple.sch");
    fs::write(&input, "v 20110115 2\nN 0 0 100 100 4\n").unwrap();

    let mut cmd = schemasvg_cli();
    cmd.arg("detect").arg(&input);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Geda"));
}

#[test]
fn test_cli_batch_converts_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.sch"), "N 0 0 100 100 4\n").unwrap();
    fs::write(dir.path().join("b.sch"), "N 0 0 200 200 4\n").unwrap();
    fs::write(dir.path().join("notes.txt"), "not a schematic").unwrap();

    let mut cmd = schemasvg_cli();
    cmd.arg("batch").arg(dir.path());
    cmd.assert().success();

    assert!(dir.path().join("a.svg").is_file());
    assert!(dir.path().join("b.svg").is_file());
    assert!(!dir.path().join("notes.svg").exists());
}

#[test]
fn test_cli_batch_empty_directory_fails() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = schemasvg_cli();
    cmd.arg("batch").arg(dir.path());
    cmd.assert().failure();
}

#[test]
fn test_cli_unparseable_input_still_writes_svg() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.sch");
    fs::write(&input, "not a schematic in any dialect").unwrap();

    let mut cmd = schemasvg_cli();
    cmd.arg("convert").arg(&input);
    cmd.assert().success();

    let svg = fs::read_to_string(dir.path().join("broken.svg")).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.trim_end().ends_with("</svg>"));
}
