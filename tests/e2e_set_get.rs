mod common;
use assert_cmd::Command;
use common::cli::{StrataWorkspace, run_strata};
use predicates::prelude::*;

#[test]
fn test_set_then_get_roundtrips() {
    let workspace = StrataWorkspace::new();

    let output = run_strata(&workspace, ["init"], "init");
    assert!(output.status.success(), "init failed: {}", output.stderr);

    let output = run_strata(
        &workspace,
        ["set", "default_currency", "USD", "--user", "7", "--workspace", "3"],
        "set",
    );
    assert!(output.status.success(), "set failed: {}", output.stderr);
    assert!(output.stdout.contains("default_currency"));

    let output = run_strata(
        &workspace,
        ["get", "default_currency", "--user", "7", "--workspace", "3"],
        "get",
    );
    assert!(output.status.success());
    assert_eq!(output.stdout.trim(), "USD");
}

#[test]
fn test_get_unwritten_key_prints_default() {
    let workspace = StrataWorkspace::new();
    run_strata(&workspace, ["init"], "init");

    let output = run_strata(
        &workspace,
        ["get", "brand_title", "--default", "Untitled", "--user", "7"],
        "get_default",
    );
    assert!(output.status.success());
    assert_eq!(output.stdout.trim(), "Untitled");
}

#[test]
fn test_workspace_read_falls_back_to_company_row() {
    let workspace = StrataWorkspace::new();
    run_strata(&workspace, ["init"], "init");

    // Company-wide write, despite the workspace flag.
    let output = run_strata(
        &workspace,
        [
            "set",
            "brand_title",
            "Acme",
            "--user",
            "7",
            "--workspace",
            "3",
            "--ignore-workspace",
        ],
        "set_company",
    );
    assert!(output.status.success(), "set failed: {}", output.stderr);

    // Workspace read resolves through the company row.
    let output = run_strata(
        &workspace,
        ["get", "brand_title", "--user", "7", "--workspace", "3", "--json"],
        "get_json",
    );
    assert!(output.status.success());
    assert!(output.stdout.contains(r#""value":"Acme""#));
    assert!(output.stdout.contains(r#""source":"company""#));
}

#[test]
fn test_flag_value_round_trips_as_stored_string() {
    let workspace = StrataWorkspace::new();
    run_strata(&workspace, ["init"], "init");

    let output = run_strata(
        &workspace,
        ["set", "float_number", "true", "--user", "7"],
        "set_flag",
    );
    assert!(output.status.success(), "set failed: {}", output.stderr);

    let output = run_strata(&workspace, ["get", "float_number", "--user", "7"], "get_flag");
    assert!(output.status.success());
    assert_eq!(output.stdout.trim(), "1");
}

#[test]
fn test_unknown_key_is_rejected() {
    let workspace = StrataWorkspace::new();
    run_strata(&workspace, ["init"], "init");

    let output = run_strata(
        &workspace,
        ["set", "decimal_fromat", "2", "--user", "7"],
        "set_typo",
    );
    assert!(!output.status.success());
    assert!(output.stderr.contains("Unknown setting key"));
}

#[test]
fn test_invalid_value_is_rejected_with_field_error() {
    let workspace = StrataWorkspace::new();
    run_strata(&workspace, ["init"], "init");

    let output = run_strata(
        &workspace,
        ["set", "mail_port", "not-a-port", "--user", "7"],
        "set_bad_port",
    );
    assert!(!output.status.success());
    assert!(output.stderr.contains("mail_port"));
}

#[test]
fn test_saas_mode_requires_acting_user() {
    let workspace = StrataWorkspace::new();
    run_strata(&workspace, ["init"], "init");

    let output = run_strata(&workspace, ["get", "brand_title"], "get_no_user");
    assert!(!output.status.success());
    assert!(output.stderr.contains("--user"));
}

#[test]
fn test_version_short_prints_semver() {
    let workspace = StrataWorkspace::new();
    Command::cargo_bin("strata")
        .expect("strata binary")
        .current_dir(&workspace.root)
        .args(["version", "--short"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\d+\.\d+\.\d+").expect("semver pattern"));
}

#[test]
fn test_commands_require_init() {
    let workspace = StrataWorkspace::new();

    let output = run_strata(&workspace, ["get", "brand_title", "--user", "7"], "no_init");
    assert!(!output.status.success());
    assert!(output.stderr.contains("strata init"));
}
