mod common;
use common::cli::{StrataWorkspace, run_strata};
use std::fs;

#[test]
fn test_export_then_import_reproduces_rows() {
    let source = StrataWorkspace::new();
    run_strata(&source, ["init"], "init_source");

    run_strata(
        &source,
        ["set", "default_currency", "USD", "--user", "7", "--workspace", "3"],
        "set_ws",
    );
    run_strata(
        &source,
        ["set", "recaptcha_enabled", "true", "--user", "7", "--ignore-workspace"],
        "set_company",
    );

    let output = run_strata(&source, ["export"], "export");
    assert!(output.status.success(), "export failed: {}", output.stderr);
    assert!(output.stdout.contains("Exported 2 rows"));

    // Move the JSONL into a fresh workspace and import it.
    let target = StrataWorkspace::new();
    run_strata(&target, ["init"], "init_target");
    fs::copy(
        source.root.join(".strata/settings.jsonl"),
        target.root.join(".strata/settings.jsonl"),
    )
    .expect("copy export");

    let output = run_strata(&target, ["import"], "import");
    assert!(output.status.success(), "import failed: {}", output.stderr);
    assert!(output.stdout.contains("Imported 2 rows"));

    let output = run_strata(
        &target,
        ["get", "default_currency", "--user", "7", "--workspace", "3"],
        "get_after_import",
    );
    assert_eq!(output.stdout.trim(), "USD");

    let output = run_strata(
        &target,
        ["get", "recaptcha_enabled", "--user", "7"],
        "get_flag_after_import",
    );
    assert_eq!(output.stdout.trim(), "1");
}

#[test]
fn test_doctor_is_healthy_after_export() {
    let workspace = StrataWorkspace::new();
    run_strata(&workspace, ["init"], "init");
    run_strata(
        &workspace,
        ["set", "brand_title", "Acme", "--user", "7"],
        "set",
    );
    run_strata(&workspace, ["export"], "export");

    let output = run_strata(&workspace, ["doctor", "--json"], "doctor");
    assert!(output.status.success(), "doctor failed: {}", output.stderr);
    assert!(output.stdout.contains(r#""ok":true"#));
}

#[test]
fn test_doctor_flags_count_drift() {
    let workspace = StrataWorkspace::new();
    run_strata(&workspace, ["init"], "init");
    run_strata(
        &workspace,
        ["set", "brand_title", "Acme", "--user", "7"],
        "set",
    );
    run_strata(&workspace, ["export"], "export");

    // A write after the export leaves the JSONL stale.
    run_strata(
        &workspace,
        ["set", "default_currency", "USD", "--user", "7"],
        "set_after_export",
    );

    let output = run_strata(&workspace, ["doctor", "--json"], "doctor");
    // Drift is a warning, not an error.
    assert!(output.status.success());
    assert!(output.stdout.contains("counts.db_vs_jsonl"));
    assert!(output.stdout.contains("warn"));
}

#[test]
fn test_import_rejects_unknown_keys() {
    let workspace = StrataWorkspace::new();
    run_strata(&workspace, ["init"], "init");

    fs::write(
        workspace.root.join(".strata/settings.jsonl"),
        r#"{"owner_id":7,"key":"not_a_key","value":"x","created_at":"2026-01-01T00:00:00Z","updated_at":"2026-01-01T00:00:00Z"}"#,
    )
    .expect("write bad jsonl");

    let output = run_strata(&workspace, ["import"], "import_bad");
    assert!(!output.status.success());
    assert!(output.stderr.contains("line 1"));
}

#[test]
fn test_keys_lists_the_registry() {
    let workspace = StrataWorkspace::new();

    // keys needs no initialized workspace.
    let output = run_strata(&workspace, ["keys"], "keys");
    assert!(output.status.success());
    assert!(output.stdout.contains("default_currency [currency] text"));
    assert!(output.stdout.contains("mail_port [email] integer"));
    assert!(
        output
            .stdout
            .contains("currency_symbol_position [currency] choice: before|after")
    );
    assert!(output.stdout.contains("31 keys"));

    let output = run_strata(&workspace, ["keys", "--section", "recaptcha"], "keys_section");
    assert!(output.status.success());
    assert!(output.stdout.contains("3 keys"));
}
