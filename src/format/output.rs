use serde::Serialize;
use strata_lib::{Scope, Section, Setting, SettingKey, ValueSource};

use crate::format::text::display_value;

/// Resolution result for the get view.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedSetting {
    pub key: SettingKey,
    pub value: String,
    pub source: ValueSource,
    pub scope: Scope,
}

/// One stored row for the list view.
#[derive(Debug, Clone, Serialize)]
pub struct SettingRowView {
    pub key: SettingKey,
    pub section: Section,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<i64>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl SettingRowView {
    /// Build a view row, masking secret values.
    #[must_use]
    pub fn from_row(row: &Setting) -> Self {
        Self {
            key: row.key,
            section: row.key.section(),
            value: display_value(row.key, &row.value),
            workspace_id: row.workspace_id,
            updated_at: row.updated_at,
        }
    }
}

/// Registry entry for the keys view.
#[derive(Debug, Clone, Serialize)]
pub struct KeyInfo {
    pub key: SettingKey,
    pub section: Section,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<&'static str>>,
    pub secret: bool,
}

impl KeyInfo {
    #[must_use]
    pub fn describe(key: SettingKey) -> Self {
        let kind = key.kind();
        let choices = match kind {
            strata_lib::ValueKind::Choice(allowed) => Some(allowed.to_vec()),
            _ => None,
        };
        Self {
            key,
            section: key.section(),
            kind: kind.name(),
            choices,
            secret: kind.is_secret(),
        }
    }
}
