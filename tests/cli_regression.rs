// Regression test: CLI compiles files end-to-end and renders miette
// diagnostics on failure.
// Requires: assert_cmd, predicates crates in [dev-dependencies]

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

#[test]
fn cli_compiles_a_file_to_stdout() {
    let file = "tests/counter_demo.oddo";
    fs::write(file, "@state count = 0\nincrement = () => count := count + 1\n").unwrap();

    let mut cmd = Command::cargo_bin("oddo").unwrap();
    cmd.arg("compile").arg(file);
    cmd.assert()
        .success()
        .stdout(contains("import Oddo from \"oddo\";").and(contains("Oddo.state(0)")));

    let _ = fs::remove_file(file);
}

#[test]
fn cli_reports_miette_diagnostics_on_error() {
    // A declaration onto a member access is the canonical misuse.
    let bad_file = "tests/bad_script.oddo";
    fs::write(bad_file, "x.y = 1\n").unwrap();

    let mut cmd = Command::cargo_bin("oddo").unwrap();
    cmd.arg("compile").arg(bad_file);
    cmd.assert()
        .failure()
        .stderr(contains("oddo::parse").or(contains("must use := operator")));

    let _ = fs::remove_file(bad_file);
}

#[test]
fn cli_check_validates_without_output() {
    let file = "tests/check_demo.oddo";
    fs::write(file, "x = 1\n").unwrap();

    let mut cmd = Command::cargo_bin("oddo").unwrap();
    cmd.arg("check").arg(file);
    cmd.assert().success().stdout(contains("ok"));

    let _ = fs::remove_file(file);
}

#[test]
fn cli_ast_prints_json() {
    let file = "tests/ast_demo.oddo";
    fs::write(file, "x = 1\n").unwrap();

    let mut cmd = Command::cargo_bin("oddo").unwrap();
    cmd.arg("ast").arg(file);
    cmd.assert()
        .success()
        .stdout(contains("\"body\"").and(contains("Declaration")));

    let _ = fs::remove_file(file);
}
