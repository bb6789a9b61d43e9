//! JSONL file I/O for settings rows.
//!
//! Each line in the JSONL file is one complete `Setting`. The same
//! format is produced by the CLI's export command.

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::error::{Result, SettingsError};
use crate::model::Setting;

/// Load settings rows from a JSONL file.
///
/// Returns each row with its 1-based line number so callers can report
/// duplicate triples precisely. Blank lines are skipped.
///
/// # Errors
///
/// Returns `Io` if the file cannot be read, or `JsonlParse` if any line
/// is invalid (including lines carrying unknown keys).
pub fn load(path: &Path) -> Result<Vec<(usize, Setting)>> {
    let file = fs::File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SettingsError::FileNotFound(path.to_path_buf())
        } else {
            SettingsError::Io(e)
        }
    })?;
    let reader = BufReader::new(file);

    let mut rows = Vec::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let row: Setting = serde_json::from_str(trimmed).map_err(|e| SettingsError::JsonlParse {
            line: line_num + 1,
            reason: e.to_string(),
        })?;
        rows.push((line_num + 1, row));
    }

    Ok(rows)
}

/// Save settings rows to a JSONL file with atomic write.
///
/// Uses write-to-temp + rename for atomicity.
///
/// # Errors
///
/// Returns `Io` if the file cannot be written.
pub fn save(path: &Path, rows: &[Setting]) -> Result<()> {
    let tmp_path = path.with_extension("jsonl.tmp");
    let mut file = fs::File::create(&tmp_path)?;

    for row in rows {
        let json = serde_json::to_string(row)?;
        writeln!(file, "{json}")?;
    }

    file.flush()?;
    drop(file);

    // Atomic rename
    fs::rename(&tmp_path, path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::SettingKey;
    use chrono::Utc;

    fn row(key: SettingKey, value: &str) -> Setting {
        let now = Utc::now();
        Setting {
            owner_id: 7,
            workspace_id: Some(3),
            key,
            value: value.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.jsonl");

        let rows = vec![
            row(SettingKey::DefaultCurrency, "USD"),
            row(SettingKey::FloatNumber, "1"),
        ];
        save(&path, &rows).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].1, rows[0]);
        assert_eq!(loaded[1].1, rows[1]);
        assert_eq!(loaded[1].0, 2);
    }

    #[test]
    fn test_load_missing_file() {
        let result = load(Path::new("/nonexistent/settings.jsonl"));
        assert!(matches!(result, Err(SettingsError::FileNotFound(_))));
    }

    #[test]
    fn test_load_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jsonl");
        fs::write(&path, "").unwrap();

        let loaded = load(&path).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_load_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blanks.jsonl");
        let json = serde_json::to_string(&row(SettingKey::BrandTitle, "Acme")).unwrap();
        fs::write(&path, format!("\n{json}\n\n")).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].0, 2);
    }

    #[test]
    fn test_load_rejects_unknown_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.jsonl");
        fs::write(
            &path,
            r#"{"owner_id":7,"key":"not_a_key","value":"x","created_at":"2026-01-01T00:00:00Z","updated_at":"2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        let result = load(&path);
        assert!(matches!(result, Err(SettingsError::JsonlParse { line: 1, .. })));
    }
}
