//! Doctor command implementation.

use crate::config::{Config, DB_FILE, JSONL_FILE, STRATA_DIR};
use crate::error::Result;
use rusqlite::{Connection, OpenFlags};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Ok,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
struct DoctorReport {
    ok: bool,
    checks: Vec<CheckResult>,
}

fn push_check(
    checks: &mut Vec<CheckResult>,
    name: &str,
    status: CheckStatus,
    message: Option<String>,
    details: Option<serde_json::Value>,
) {
    checks.push(CheckResult {
        name: name.to_string(),
        status,
        message,
        details,
    });
}

fn has_error(checks: &[CheckResult]) -> bool {
    checks
        .iter()
        .any(|check| matches!(check.status, CheckStatus::Error))
}

fn print_report(report: &DoctorReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(&report)?);
        return Ok(());
    }

    println!("strata doctor");
    for check in &report.checks {
        let label = match check.status {
            CheckStatus::Ok => "OK",
            CheckStatus::Warn => "WARN",
            CheckStatus::Error => "ERROR",
        };
        if let Some(message) = &check.message {
            println!("{label} {}: {}", check.name, message);
        } else {
            println!("{label} {}", check.name);
        }
    }
    Ok(())
}

fn check_config(root: &Path, checks: &mut Vec<CheckResult>) {
    match Config::load(root) {
        Ok(config) => push_check(
            checks,
            "config",
            CheckStatus::Ok,
            None,
            Some(serde_json::json!({
                "mode": config.mode,
                "owner_user_id": config.owner_user_id,
                "fallback": config.fallback,
            })),
        ),
        Err(err) => push_check(
            checks,
            "config",
            CheckStatus::Error,
            Some(err.to_string()),
            None,
        ),
    }
}

fn collect_table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;
    let mut columns = Vec::new();
    for row in rows {
        columns.push(row?);
    }
    Ok(columns)
}

fn required_schema_checks(conn: &Connection, checks: &mut Vec<CheckResult>) -> Result<()> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    let mut tables = Vec::new();
    for row in rows {
        tables.push(row?);
    }

    if tables.iter().any(|t| t == "settings") {
        push_check(
            checks,
            "schema.tables",
            CheckStatus::Ok,
            None,
            Some(serde_json::json!({ "tables": tables })),
        );
    } else {
        push_check(
            checks,
            "schema.tables",
            CheckStatus::Error,
            Some("Missing settings table".to_string()),
            None,
        );
        return Ok(());
    }

    let required_columns = [
        "owner_id",
        "workspace_id",
        "key",
        "value",
        "created_at",
        "updated_at",
    ];
    let present = collect_table_columns(conn, "settings")?;
    let missing: Vec<&str> = required_columns
        .iter()
        .copied()
        .filter(|col| !present.iter().any(|p| p == col))
        .collect();

    if missing.is_empty() {
        push_check(checks, "schema.columns", CheckStatus::Ok, None, None);
    } else {
        push_check(
            checks,
            "schema.columns",
            CheckStatus::Error,
            Some(format!("Missing columns: {}", missing.join(", "))),
            Some(serde_json::json!({ "missing": missing })),
        );
    }

    // The scope-uniqueness invariant lives in this index.
    let index_count: i64 = conn.query_row(
        "SELECT count(*) FROM sqlite_master
         WHERE type='index' AND name='idx_settings_scope_key'",
        [],
        |row| row.get(0),
    )?;
    if index_count == 1 {
        push_check(checks, "schema.scope_index", CheckStatus::Ok, None, None);
    } else {
        push_check(
            checks,
            "schema.scope_index",
            CheckStatus::Error,
            Some("Missing unique scope index idx_settings_scope_key".to_string()),
            None,
        );
    }

    Ok(())
}

fn check_integrity(conn: &Connection, checks: &mut Vec<CheckResult>) -> Result<()> {
    let result: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
    if result.trim().eq_ignore_ascii_case("ok") {
        push_check(
            checks,
            "sqlite.integrity_check",
            CheckStatus::Ok,
            None,
            None,
        );
    } else {
        push_check(
            checks,
            "sqlite.integrity_check",
            CheckStatus::Error,
            Some(result),
            None,
        );
    }
    Ok(())
}

fn check_jsonl(path: &Path, checks: &mut Vec<CheckResult>) -> Result<usize> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut total = 0usize;
    let mut invalid = Vec::new();
    let mut invalid_count = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        total += 1;
        if serde_json::from_str::<strata_lib::Setting>(trimmed).is_err() {
            invalid_count += 1;
            if invalid.len() < 10 {
                invalid.push(idx + 1);
            }
        }
    }

    if invalid.is_empty() {
        push_check(
            checks,
            "jsonl.parse",
            CheckStatus::Ok,
            Some(format!("Parsed {total} records")),
            Some(serde_json::json!({
                "path": path.display().to_string(),
                "records": total
            })),
        );
    } else {
        push_check(
            checks,
            "jsonl.parse",
            CheckStatus::Error,
            Some(format!(
                "Malformed JSONL lines: {invalid_count} (first: {invalid:?})"
            )),
            Some(serde_json::json!({
                "path": path.display().to_string(),
                "records": total,
                "invalid_lines": invalid,
                "invalid_count": invalid_count
            })),
        );
    }

    Ok(total)
}

fn check_db_count(
    conn: &Connection,
    jsonl_count: Option<usize>,
    checks: &mut Vec<CheckResult>,
) -> Result<()> {
    let db_count: i64 = conn.query_row("SELECT count(*) FROM settings", [], |row| row.get(0))?;

    if let Some(jsonl_count) = jsonl_count {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        let db_count_usize = db_count as usize;
        if db_count_usize == jsonl_count {
            push_check(
                checks,
                "counts.db_vs_jsonl",
                CheckStatus::Ok,
                Some(format!("Both have {db_count} records")),
                None,
            );
        } else {
            push_check(
                checks,
                "counts.db_vs_jsonl",
                CheckStatus::Warn,
                Some("DB and JSONL counts differ (re-run export)".to_string()),
                Some(serde_json::json!({
                    "db": db_count,
                    "jsonl": jsonl_count
                })),
            );
        }
    } else {
        push_check(
            checks,
            "counts.db_vs_jsonl",
            CheckStatus::Warn,
            Some("JSONL not found; cannot compare counts".to_string()),
            Some(serde_json::json!({ "db": db_count })),
        );
    }

    Ok(())
}

/// Execute the doctor command.
///
/// # Errors
///
/// Returns an error if report serialization fails or if IO operations fail.
pub fn execute(json: bool) -> Result<()> {
    let mut checks = Vec::new();
    let root = Path::new(".");
    let strata_dir = root.join(STRATA_DIR);

    if !strata_dir.exists() {
        push_check(
            &mut checks,
            "strata_dir",
            CheckStatus::Error,
            Some("Missing .strata directory (run `strata init`)".to_string()),
            None,
        );
        let report = DoctorReport {
            ok: !has_error(&checks),
            checks,
        };
        print_report(&report, json)?;
        std::process::exit(1);
    }

    check_config(root, &mut checks);

    let jsonl_path = strata_dir.join(JSONL_FILE);
    let jsonl_count = if jsonl_path.exists() {
        match check_jsonl(&jsonl_path, &mut checks) {
            Ok(count) => Some(count),
            Err(err) => {
                push_check(
                    &mut checks,
                    "jsonl.parse",
                    CheckStatus::Error,
                    Some(format!("Failed to read JSONL: {err}")),
                    Some(serde_json::json!({ "path": jsonl_path.display().to_string() })),
                );
                None
            }
        }
    } else {
        push_check(
            &mut checks,
            "jsonl.parse",
            CheckStatus::Warn,
            Some("No JSONL export found (.strata/settings.jsonl)".to_string()),
            None,
        );
        None
    };

    let db_path = strata_dir.join(DB_FILE);
    if db_path.exists() {
        match Connection::open_with_flags(&db_path, OpenFlags::SQLITE_OPEN_READ_ONLY) {
            Ok(conn) => {
                required_schema_checks(&conn, &mut checks)?;
                check_integrity(&conn, &mut checks)?;
                check_db_count(&conn, jsonl_count, &mut checks)?;
            }
            Err(err) => {
                push_check(
                    &mut checks,
                    "db.open",
                    CheckStatus::Error,
                    Some(format!("Failed to open DB read-only: {err}")),
                    Some(serde_json::json!({ "path": db_path.display().to_string() })),
                );
            }
        }
    } else {
        push_check(
            &mut checks,
            "db.exists",
            CheckStatus::Error,
            Some("Missing .strata/settings.db".to_string()),
            None,
        );
    }

    let report = DoctorReport {
        ok: !has_error(&checks),
        checks,
    };
    print_report(&report, json)?;

    if !report.ok {
        std::process::exit(1);
    }

    Ok(())
}
