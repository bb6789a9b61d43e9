//! `strata-lib` — In-process scoped settings store.
//!
//! Provides a standalone, SQLite-free API for resolving and updating
//! per-tenant settings. Rows are stored in memory and persisted via
//! JSONL files.
//!
//! # Quick Start
//!
//! ```no_run
//! use strata_lib::{Fallback, InMemoryStore, Scope, SettingKey, SettingValue};
//!
//! // Load existing file
//! let mut store = InMemoryStore::open("path/to/.strata/settings.jsonl").unwrap();
//!
//! // Resolve (workspace override → company row → default)
//! let scope = Scope::workspace(7, 3);
//! let currency = store.get(SettingKey::DefaultCurrency, "USD", &scope, Fallback::default());
//!
//! // Update
//! store.update(SettingKey::FloatNumber, &SettingValue::Flag(true), &scope, false).unwrap();
//!
//! // Save back
//! store.save().unwrap();
//! ```

pub mod error;
pub mod jsonl;
pub mod keys;
pub mod model;
pub mod scope;
pub mod store;

pub use error::{Result, SettingsError, ValidationError};
pub use keys::{ALL_KEYS, Section, SettingKey, ValueKind};
pub use model::{Setting, SettingValue};
pub use scope::{DeployMode, Fallback, ListFilters, Scope, TenantContext, ValueSource};
pub use store::InMemoryStore;
