//! In-memory settings store backed by `HashMap`.
//!
//! Provides the full get/update/list API over scoped settings rows
//! without any database dependency.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::{Result, SettingsError};
use crate::jsonl;
use crate::keys::{SettingKey, ValueKind};
use crate::model::{Setting, SettingValue};
use crate::scope::{Fallback, ListFilters, Scope, ValueSource};

type Triple = (i64, Option<i64>, SettingKey);

/// In-memory scoped settings store.
///
/// All rows live in memory. Use `open()` to load from a JSONL file and
/// `save()` to persist back.
pub struct InMemoryStore {
    rows: HashMap<Triple, Setting>,
    dirty: HashSet<Triple>,
    jsonl_path: Option<PathBuf>,
}

impl InMemoryStore {
    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: HashMap::new(),
            dirty: HashSet::new(),
            jsonl_path: None,
        }
    }

    /// Open and load from a JSONL file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if two
    /// lines claim the same `(owner, workspace, key)` triple.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let loaded = jsonl::load(path)?;

        let mut store = Self::new();
        store.jsonl_path = Some(path.to_path_buf());

        for (line, row) in loaded {
            let triple = row.triple();
            if store.rows.insert(triple, row).is_some() {
                return Err(SettingsError::DuplicateRow {
                    key: triple.2.as_str().to_string(),
                    line,
                });
            }
        }

        Ok(store)
    }

    /// Save to the file that was opened.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if no file path is set, or `Io` on write failure.
    pub fn save(&self) -> Result<()> {
        let path = self
            .jsonl_path
            .as_ref()
            .ok_or_else(|| SettingsError::Storage("No file path set; use save_to()".to_string()))?;
        self.save_to(path.clone())
    }

    /// Save to a specific file path.
    ///
    /// # Errors
    ///
    /// Returns `Io` on write failure.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        jsonl::save(path.as_ref(), &self.rows_for_export())
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Resolve a key against a scope, reporting which row matched.
    ///
    /// With a workspace scope, the workspace row wins; when it is absent
    /// and the policy is `CompanyWide`, the owner's company row is
    /// consulted. A company scope only ever reads company rows.
    #[must_use]
    pub fn resolve(
        &self,
        key: SettingKey,
        scope: &Scope,
        fallback: Fallback,
    ) -> Option<(&Setting, ValueSource)> {
        if let Some(ws) = scope.workspace_id {
            if let Some(row) = self.rows.get(&(scope.owner_id, Some(ws), key)) {
                return Some((row, ValueSource::Workspace));
            }
            if fallback == Fallback::Exact {
                return None;
            }
        }
        self.rows
            .get(&(scope.owner_id, None, key))
            .map(|row| (row, ValueSource::Company))
    }

    /// Get the stored value for a key, or the supplied default.
    ///
    /// Missing data is not an error; the default is returned verbatim.
    /// Stored strings are never re-coerced (a flag written as `true`
    /// reads back as `"1"`).
    #[must_use]
    pub fn get(&self, key: SettingKey, default: &str, scope: &Scope, fallback: Fallback) -> String {
        self.resolve(key, scope, fallback)
            .map_or_else(|| default.to_string(), |(row, _)| row.value.clone())
    }

    /// List rows visible to a scope.
    #[must_use]
    pub fn list(&self, scope: &Scope, filters: &ListFilters) -> Vec<&Setting> {
        let mut results: Vec<&Setting> = self
            .rows
            .values()
            .filter(|row| row.owner_id == scope.owner_id)
            .filter(|row| match scope.workspace_id {
                Some(ws) => {
                    row.workspace_id == Some(ws)
                        || (filters.include_company && row.workspace_id.is_none())
                }
                None => row.workspace_id.is_none(),
            })
            .filter(|row| Self::matches_filters(row, filters))
            .collect();

        results.sort_by_key(|row| (row.workspace_id, row.key));

        if let Some(limit) = filters.limit {
            results.truncate(limit);
        }

        results
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Upsert one setting for the resolved write target.
    ///
    /// The value is validated against the key's kind, encoded to its
    /// stored string, and written to `(owner, workspace, key)` — or the
    /// owner's company row when `ignore_workspace` is set.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` when the value does not conform to the
    /// key's kind.
    pub fn update(
        &mut self,
        key: SettingKey,
        value: &SettingValue,
        scope: &Scope,
        ignore_workspace: bool,
    ) -> Result<Setting> {
        key.check(value)?;
        let target = scope.write_target(ignore_workspace);
        Ok(self.write_row(key, value.encode(), &target))
    }

    /// Apply a batch of updates with all-or-nothing semantics.
    ///
    /// Every entry is validated before anything is written; one invalid
    /// entry means zero rows change. Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Returns `NothingToDo` on an empty batch, or the collected
    /// validation failure otherwise.
    pub fn update_many(
        &mut self,
        entries: &[(SettingKey, SettingValue)],
        scope: &Scope,
        ignore_workspace: bool,
    ) -> Result<usize> {
        if entries.is_empty() {
            return Err(SettingsError::NothingToDo {
                reason: "empty batch".to_string(),
            });
        }

        for (key, value) in entries {
            key.check(value)?;
        }

        let target = scope.write_target(ignore_workspace);
        for (key, value) in entries {
            self.write_row(*key, value.encode(), &target);
        }

        Ok(entries.len())
    }

    /// Reset a flag key to `"0"` at the given scope.
    ///
    /// Used to clear stored verification state (e.g. a calendar-sync
    /// flag) after a failed external check.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` when the key is not a flag.
    pub fn reset_flag(&mut self, key: SettingKey, scope: &Scope) -> Result<Setting> {
        if key.kind() != ValueKind::Flag {
            return Err(SettingsError::invalid_value(
                key.as_str(),
                "not a flag key",
            ));
        }
        Ok(self.write_row(key, "0".to_string(), scope))
    }

    // ========================================================================
    // Bulk Export
    // ========================================================================

    /// All rows, sorted for deterministic output.
    #[must_use]
    pub fn rows_for_export(&self) -> Vec<Setting> {
        let mut rows: Vec<Setting> = self.rows.values().cloned().collect();
        rows.sort_by_key(Setting::triple);
        rows
    }

    // ========================================================================
    // Dirty Tracking
    // ========================================================================

    /// Check if any rows have been modified since the last clear.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Number of modified triples.
    #[must_use]
    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// Clear dirty tracking flags.
    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
    }

    /// Total number of stored rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    fn write_row(&mut self, key: SettingKey, encoded: String, target: &Scope) -> Setting {
        let now = Utc::now();
        let triple = (target.owner_id, target.workspace_id, key);

        let row = self
            .rows
            .entry(triple)
            .and_modify(|row| {
                row.value.clone_from(&encoded);
                row.updated_at = now;
            })
            .or_insert_with(|| Setting {
                owner_id: target.owner_id,
                workspace_id: target.workspace_id,
                key,
                value: encoded,
                created_at: now,
                updated_at: now,
            })
            .clone();

        tracing::debug!(key = key.as_str(), scope = %target, "setting written");
        self.dirty.insert(triple);
        row
    }

    fn matches_filters(row: &Setting, filters: &ListFilters) -> bool {
        if let Some(section) = filters.section {
            if row.key.section() != section {
                return false;
            }
        }
        if let Some(ref needle) = filters.key_contains {
            if !row.key.as_str().contains(needle.as_str()) {
                return false;
            }
        }
        true
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
