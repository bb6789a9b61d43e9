//! Core data types for `strata-lib`.
//!
//! Same serde format as the `strata` CLI so JSONL exports are
//! interoperable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::keys::SettingKey;

/// A typed value headed for storage.
///
/// The store persists strings only; `encode` is the single place where
/// scalars become their stored form (`true` → `"1"`). Reads hand the
/// stored string back verbatim and never re-coerce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Text(String),
    Flag(bool),
    Integer(i64),
}

impl SettingValue {
    /// The stored string form of this value.
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Flag(true) => "1".to_string(),
            Self::Flag(false) => "0".to_string(),
            Self::Integer(n) => n.to_string(),
        }
    }

    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Flag(_) => "flag",
            Self::Integer(_) => "integer",
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<bool> for SettingValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl From<i64> for SettingValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

/// One stored settings row.
///
/// At most one row exists per `(owner_id, workspace_id, key)` triple.
/// `workspace_id = None` is the company-wide row for that owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Setting {
    /// Owning user (company account in SaaS mode, the designated owner
    /// in self-hosted mode).
    pub owner_id: i64,

    /// Workspace the row is scoped to; `None` for company-wide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<i64>,

    /// Registry key.
    pub key: SettingKey,

    /// Stored string value.
    pub value: String,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Setting {
    /// The identity triple this row occupies.
    #[must_use]
    pub const fn triple(&self) -> (i64, Option<i64>, SettingKey) {
        (self.owner_id, self.workspace_id, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_encoding_is_one_and_zero() {
        assert_eq!(SettingValue::Flag(true).encode(), "1");
        assert_eq!(SettingValue::Flag(false).encode(), "0");
    }

    #[test]
    fn integer_encoding_is_decimal() {
        assert_eq!(SettingValue::Integer(587).encode(), "587");
        assert_eq!(SettingValue::Integer(-3).encode(), "-3");
    }

    #[test]
    fn text_encoding_is_verbatim() {
        assert_eq!(SettingValue::Text("USD".to_string()).encode(), "USD");
    }

    #[test]
    fn setting_serde_roundtrip() {
        let now = Utc::now();
        let row = Setting {
            owner_id: 7,
            workspace_id: Some(3),
            key: SettingKey::DefaultCurrency,
            value: "USD".to_string(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_string(&row).unwrap();
        let back: Setting = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn company_row_omits_workspace_field() {
        let now = Utc::now();
        let row = Setting {
            owner_id: 7,
            workspace_id: None,
            key: SettingKey::BrandTitle,
            value: "Acme".to_string(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_string(&row).unwrap();
        assert!(!json.contains("workspace_id"));
    }
}
