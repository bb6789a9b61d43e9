//! `SQLite` storage layer for `strata`.
//!
//! This module provides the persistence layer using `SQLite` with:
//! - WAL mode for concurrent reads
//! - Transaction discipline for atomic batch writes
//! - A unique index over `(owner, workspace, key)` so a triple can
//!   never hold two rows
//! - JSONL export/import interoperable with `strata-lib`

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use strata_lib::keys::ValueKind;
use strata_lib::{Fallback, ListFilters, Scope, Setting, SettingKey, SettingValue, ValueSource};

use crate::error::{Result, StrataError};

/// Current schema version, tracked via `PRAGMA user_version`.
pub const SCHEMA_VERSION: i32 = 1;

/// Schema initialization SQL.
///
/// Convention notes:
/// - Timestamps are RFC 3339 TEXT
/// - `workspace_id` is NULL for company-wide rows; workspace ids are
///   positive, so 0 stands in for NULL in the unique index
pub const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS settings (
    id INTEGER PRIMARY KEY,
    owner_id INTEGER NOT NULL,
    workspace_id INTEGER,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_settings_scope_key
    ON settings(owner_id, COALESCE(workspace_id, 0), key);

CREATE INDEX IF NOT EXISTS idx_settings_owner
    ON settings(owner_id);
";

const ROW_COLUMNS: &str = "owner_id, workspace_id, key, value, created_at, updated_at";

/// SQLite-backed scoped settings store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Open (and initialize if needed) a settings database.
    ///
    /// # Errors
    ///
    /// Returns `Sqlite` if the database cannot be opened or migrated.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        Self::init(conn)
    }

    /// Open an in-memory database (tests, dry runs).
    ///
    /// # Errors
    ///
    /// Returns `Sqlite` on initialization failure.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if version < SCHEMA_VERSION {
            conn.execute_batch(SCHEMA_SQL)?;
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        }

        Ok(Self { conn })
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Resolve a key against a scope, reporting which row matched.
    ///
    /// # Errors
    ///
    /// Returns `Sqlite` on query failure.
    pub fn resolve(
        &self,
        key: SettingKey,
        scope: &Scope,
        fallback: Fallback,
    ) -> Result<Option<(Setting, ValueSource)>> {
        if let Some(ws) = scope.workspace_id {
            if let Some(row) = self.find_row(scope.owner_id, Some(ws), key)? {
                return Ok(Some((row, ValueSource::Workspace)));
            }
            if fallback == Fallback::Exact {
                return Ok(None);
            }
        }
        Ok(self
            .find_row(scope.owner_id, None, key)?
            .map(|row| (row, ValueSource::Company)))
    }

    /// Get the stored value for a key, or the supplied default.
    ///
    /// Missing data is not an error; the stored string is returned
    /// verbatim, never re-coerced.
    ///
    /// # Errors
    ///
    /// Returns `Sqlite` on query failure.
    pub fn get(
        &self,
        key: SettingKey,
        default: &str,
        scope: &Scope,
        fallback: Fallback,
    ) -> Result<String> {
        Ok(self
            .resolve(key, scope, fallback)?
            .map_or_else(|| default.to_string(), |(row, _)| row.value))
    }

    /// List rows visible to a scope.
    ///
    /// # Errors
    ///
    /// Returns `Sqlite` on query failure.
    pub fn list(&self, scope: &Scope, filters: &ListFilters) -> Result<Vec<Setting>> {
        let mut rows = match scope.workspace_id {
            Some(ws) if filters.include_company => self.query_rows(
                &format!(
                    "SELECT {ROW_COLUMNS} FROM settings
                     WHERE owner_id = ?1 AND (workspace_id IS ?2 OR workspace_id IS NULL)
                     ORDER BY workspace_id, key"
                ),
                params![scope.owner_id, Some(ws)],
            )?,
            other => self.query_rows(
                &format!(
                    "SELECT {ROW_COLUMNS} FROM settings
                     WHERE owner_id = ?1 AND workspace_id IS ?2
                     ORDER BY key"
                ),
                params![scope.owner_id, other],
            )?,
        };

        rows.retain(|row| {
            filters.section.is_none_or(|s| row.key.section() == s)
                && filters
                    .key_contains
                    .as_deref()
                    .is_none_or(|needle| row.key.as_str().contains(needle))
        });

        if let Some(limit) = filters.limit {
            rows.truncate(limit);
        }

        Ok(rows)
    }

    /// All rows, ordered for deterministic export.
    ///
    /// # Errors
    ///
    /// Returns `Sqlite` on query failure.
    pub fn all_rows(&self) -> Result<Vec<Setting>> {
        self.query_rows(
            &format!(
                "SELECT {ROW_COLUMNS} FROM settings
                 ORDER BY owner_id, COALESCE(workspace_id, 0), key"
            ),
            [],
        )
    }

    /// Number of stored rows.
    ///
    /// # Errors
    ///
    /// Returns `Sqlite` on query failure.
    pub fn count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT count(*) FROM settings", [], |row| row.get(0))?)
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Upsert one setting for the resolved write target
    /// (update-or-create inside a transaction).
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` when the value does not conform to the
    /// key's kind, or `Sqlite` on write failure.
    pub fn update(
        &mut self,
        key: SettingKey,
        value: &SettingValue,
        scope: &Scope,
        ignore_workspace: bool,
    ) -> Result<Setting> {
        key.check(value)?;
        let target = scope.write_target(ignore_workspace);

        let tx = self.conn.transaction()?;
        let row = Self::upsert_in(&tx, key, &value.encode(), &target)?;
        tx.commit()?;

        tracing::debug!(key = key.as_str(), scope = %target, "setting written");
        Ok(row)
    }

    /// Apply a batch of updates in a single transaction.
    ///
    /// Every entry is validated before the transaction opens; one
    /// invalid entry means zero rows change. Returns the number of rows
    /// written.
    ///
    /// # Errors
    ///
    /// Returns `NothingToDo` on an empty batch, the collected
    /// validation failure, or `Sqlite` on write failure (which rolls
    /// the whole batch back).
    pub fn update_many(
        &mut self,
        entries: &[(SettingKey, SettingValue)],
        scope: &Scope,
        ignore_workspace: bool,
    ) -> Result<usize> {
        if entries.is_empty() {
            return Err(strata_lib::SettingsError::NothingToDo {
                reason: "empty batch".to_string(),
            }
            .into());
        }

        for (key, value) in entries {
            key.check(value)?;
        }

        let target = scope.write_target(ignore_workspace);
        let tx = self.conn.transaction()?;
        for (key, value) in entries {
            Self::upsert_in(&tx, *key, &value.encode(), &target)?;
        }
        tx.commit()?;

        tracing::debug!(count = entries.len(), scope = %target, "batch written");
        Ok(entries.len())
    }

    /// Reset a flag key to `"0"` at the given scope.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` when the key is not a flag, or `Sqlite`
    /// on write failure.
    pub fn reset_flag(&mut self, key: SettingKey, scope: &Scope) -> Result<Setting> {
        if key.kind() != ValueKind::Flag {
            return Err(
                strata_lib::SettingsError::invalid_value(key.as_str(), "not a flag key").into(),
            );
        }

        let tx = self.conn.transaction()?;
        let row = Self::upsert_in(&tx, key, "0", scope)?;
        tx.commit()?;
        Ok(row)
    }

    /// Import rows (from a JSONL export), preserving their timestamps.
    ///
    /// Existing rows for the same triple are overwritten. The whole
    /// import is one transaction.
    ///
    /// # Errors
    ///
    /// Returns `Sqlite` on write failure.
    pub fn import(&mut self, rows: &[Setting]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        for row in rows {
            tx.execute(
                "DELETE FROM settings WHERE owner_id = ?1 AND workspace_id IS ?2 AND key = ?3",
                params![row.owner_id, row.workspace_id, row.key.as_str()],
            )?;
            tx.execute(
                "INSERT INTO settings (owner_id, workspace_id, key, value, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    row.owner_id,
                    row.workspace_id,
                    row.key.as_str(),
                    row.value,
                    row.created_at.to_rfc3339(),
                    row.updated_at.to_rfc3339(),
                ],
            )?;
        }
        tx.commit()?;
        Ok(rows.len())
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    fn upsert_in(tx: &Transaction<'_>, key: SettingKey, encoded: &str, target: &Scope) -> Result<Setting> {
        let now = Utc::now();

        let existing: Option<(i64, String)> = tx
            .query_row(
                "SELECT id, created_at FROM settings
                 WHERE owner_id = ?1 AND workspace_id IS ?2 AND key = ?3",
                params![target.owner_id, target.workspace_id, key.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let created_at = match existing {
            Some((id, created_at)) => {
                tx.execute(
                    "UPDATE settings SET value = ?1, updated_at = ?2 WHERE id = ?3",
                    params![encoded, now.to_rfc3339(), id],
                )?;
                parse_timestamp(&created_at)?
            }
            None => {
                tx.execute(
                    "INSERT INTO settings (owner_id, workspace_id, key, value, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                    params![
                        target.owner_id,
                        target.workspace_id,
                        key.as_str(),
                        encoded,
                        now.to_rfc3339(),
                    ],
                )?;
                now
            }
        };

        Ok(Setting {
            owner_id: target.owner_id,
            workspace_id: target.workspace_id,
            key,
            value: encoded.to_string(),
            created_at,
            updated_at: now,
        })
    }

    fn find_row(
        &self,
        owner_id: i64,
        workspace_id: Option<i64>,
        key: SettingKey,
    ) -> Result<Option<Setting>> {
        Ok(self
            .conn
            .query_row(
                &format!(
                    "SELECT {ROW_COLUMNS} FROM settings
                     WHERE owner_id = ?1 AND workspace_id IS ?2 AND key = ?3"
                ),
                params![owner_id, workspace_id, key.as_str()],
                map_row,
            )
            .optional()?)
    }

    fn query_rows<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Setting>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, map_row)?;
        let mut settings = Vec::new();
        for row in rows {
            settings.push(row?);
        }
        Ok(settings)
    }
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Setting> {
    let key_raw: String = row.get(2)?;
    let key: SettingKey = key_raw.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let created_raw: String = row.get(4)?;
    let updated_raw: String = row.get(5)?;

    Ok(Setting {
        owner_id: row.get(0)?,
        workspace_id: row.get(1)?,
        key,
        value: row.get(3)?,
        created_at: parse_ts_sql(4, &created_raw)?,
        updated_at: parse_ts_sql(5, &updated_raw)?,
    })
}

fn parse_ts_sql(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StrataError::config(format!("corrupt timestamp '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_lib::{DeployMode, TenantContext};

    fn text(s: &str) -> SettingValue {
        SettingValue::Text(s.to_string())
    }

    #[test]
    fn update_then_get_roundtrips() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let scope = Scope::workspace(7, 3);

        store
            .update(SettingKey::DefaultCurrency, &text("USD"), &scope, false)
            .unwrap();

        let value = store
            .get(SettingKey::DefaultCurrency, "EUR", &scope, Fallback::default())
            .unwrap();
        assert_eq!(value, "USD");
    }

    #[test]
    fn missing_key_returns_default() {
        let store = SqliteStore::open_in_memory().unwrap();
        let value = store
            .get(
                SettingKey::BrandTitle,
                "Untitled",
                &Scope::company(7),
                Fallback::default(),
            )
            .unwrap();
        assert_eq!(value, "Untitled");
    }

    #[test]
    fn second_write_updates_in_place() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let scope = Scope::company(7);

        store
            .update(SettingKey::BrandTitle, &text("Acme"), &scope, false)
            .unwrap();
        store
            .update(SettingKey::BrandTitle, &text("Acme Corp"), &scope, false)
            .unwrap();

        assert_eq!(store.count().unwrap(), 1);
        let value = store
            .get(SettingKey::BrandTitle, "", &scope, Fallback::default())
            .unwrap();
        assert_eq!(value, "Acme Corp");
    }

    #[test]
    fn workspace_row_shadows_company_row() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .update(
                SettingKey::DefaultCurrency,
                &text("EUR"),
                &Scope::company(7),
                false,
            )
            .unwrap();
        store
            .update(
                SettingKey::DefaultCurrency,
                &text("USD"),
                &Scope::workspace(7, 3),
                false,
            )
            .unwrap();

        let (row, source) = store
            .resolve(
                SettingKey::DefaultCurrency,
                &Scope::workspace(7, 3),
                Fallback::default(),
            )
            .unwrap()
            .unwrap();
        assert_eq!(row.value, "USD");
        assert_eq!(source, ValueSource::Workspace);
    }

    #[test]
    fn company_fallback_applies_when_workspace_row_absent() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .update(
                SettingKey::DefaultCurrency,
                &text("EUR"),
                &Scope::company(7),
                false,
            )
            .unwrap();

        let (row, source) = store
            .resolve(
                SettingKey::DefaultCurrency,
                &Scope::workspace(7, 3),
                Fallback::CompanyWide,
            )
            .unwrap()
            .unwrap();
        assert_eq!(row.value, "EUR");
        assert_eq!(source, ValueSource::Company);

        let exact = store
            .resolve(
                SettingKey::DefaultCurrency,
                &Scope::workspace(7, 3),
                Fallback::Exact,
            )
            .unwrap();
        assert!(exact.is_none());
    }

    #[test]
    fn ignore_workspace_writes_company_row() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .update(
                SettingKey::BrandTitle,
                &text("Acme"),
                &Scope::workspace(7, 3),
                true,
            )
            .unwrap();

        let (row, _) = store
            .resolve(SettingKey::BrandTitle, &Scope::company(7), Fallback::default())
            .unwrap()
            .unwrap();
        assert_eq!(row.workspace_id, None);
    }

    #[test]
    fn self_hosted_writes_collapse_to_owner() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let mode = DeployMode::SelfHosted { owner_user_id: 1 };

        for acting_user in [5, 99] {
            let scope = TenantContext::new(acting_user, Some(4), false).resolve(mode);
            store
                .update(SettingKey::BrandTitle, &text("Self-hosted"), &scope, true)
                .unwrap();
        }

        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn flag_reads_back_as_stored_string() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let scope = Scope::company(7);

        store
            .update(
                SettingKey::RecaptchaEnabled,
                &SettingValue::Flag(true),
                &scope,
                false,
            )
            .unwrap();

        let value = store
            .get(SettingKey::RecaptchaEnabled, "0", &scope, Fallback::default())
            .unwrap();
        assert_eq!(value, "1");
    }

    #[test]
    fn sequential_updates_are_independent() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let scope = Scope::company(7);

        store
            .update(SettingKey::DefaultCurrency, &text("USD"), &scope, false)
            .unwrap();
        let result = store.update(SettingKey::MailPort, &text("bad"), &scope, false);
        assert!(result.is_err());

        let value = store
            .get(SettingKey::DefaultCurrency, "", &scope, Fallback::default())
            .unwrap();
        assert_eq!(value, "USD");
    }

    #[test]
    fn update_many_is_atomic() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let scope = Scope::company(7);

        let entries = vec![
            (
                SettingKey::DefaultCurrency,
                SettingValue::Text("USD".to_string()),
            ),
            (SettingKey::MailPort, SettingValue::Text("bad".to_string())),
        ];
        assert!(store.update_many(&entries, &scope, false).is_err());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn currency_form_persists_all_seven_keys() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let scope = TenantContext::new(7, Some(3), true).resolve(DeployMode::Saas);

        let entries = vec![
            (SettingKey::DecimalFormat, SettingValue::Integer(2)),
            (
                SettingKey::DefaultCurrency,
                SettingValue::Text("USD".to_string()),
            ),
            (SettingKey::DecimalSeparator, SettingValue::Text(".".to_string())),
            (
                SettingKey::ThousandsSeparator,
                SettingValue::Text(",".to_string()),
            ),
            (SettingKey::FloatNumber, SettingValue::Flag(true)),
            (SettingKey::CurrencySymbolSpace, SettingValue::Flag(false)),
            (
                SettingKey::CurrencySymbolPosition,
                SettingValue::Text("before".to_string()),
            ),
        ];
        assert_eq!(store.update_many(&entries, &scope, false).unwrap(), 7);

        let fb = Fallback::default();
        assert_eq!(
            store.get(SettingKey::FloatNumber, "", &scope, fb).unwrap(),
            "1"
        );
        assert_eq!(
            store
                .get(SettingKey::CurrencySymbolSpace, "", &scope, fb)
                .unwrap(),
            "0"
        );
        assert_eq!(
            store
                .get(SettingKey::CurrencySymbolPosition, "", &scope, fb)
                .unwrap(),
            "before"
        );
    }

    #[test]
    fn reset_flag_clears_verification_state() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let scope = Scope::company(7);

        store
            .update(
                SettingKey::ZoomMeetingTest,
                &SettingValue::Flag(true),
                &scope,
                false,
            )
            .unwrap();
        store.reset_flag(SettingKey::ZoomMeetingTest, &scope).unwrap();

        let value = store
            .get(SettingKey::ZoomMeetingTest, "", &scope, Fallback::default())
            .unwrap();
        assert_eq!(value, "0");

        assert!(store.reset_flag(SettingKey::MailHost, &scope).is_err());
    }

    #[test]
    fn list_scopes_and_filters() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store
            .update(SettingKey::BrandTitle, &text("Acme"), &Scope::company(7), false)
            .unwrap();
        store
            .update(
                SettingKey::DefaultCurrency,
                &text("USD"),
                &Scope::workspace(7, 3),
                false,
            )
            .unwrap();

        let company = store
            .list(&Scope::company(7), &ListFilters::default())
            .unwrap();
        assert_eq!(company.len(), 1);
        assert_eq!(company[0].key, SettingKey::BrandTitle);

        let ws_with_company = store
            .list(
                &Scope::workspace(7, 3),
                &ListFilters {
                    include_company: true,
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(ws_with_company.len(), 2);
    }

    #[test]
    fn import_preserves_rows_and_timestamps() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let scope = Scope::company(7);
        store
            .update(SettingKey::BrandTitle, &text("Acme"), &scope, false)
            .unwrap();

        let rows = store.all_rows().unwrap();

        let mut other = SqliteStore::open_in_memory().unwrap();
        assert_eq!(other.import(&rows).unwrap(), 1);
        assert_eq!(other.all_rows().unwrap(), rows);
    }
}
