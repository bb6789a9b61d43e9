//! Output formatting for `strata`.
//!
//! Supports both human-readable text output and machine-parseable JSON.
//!
//! # JSON Output Types
//!
//! - [`ResolvedSetting`] - Resolution result with source scope (get)
//! - [`SettingRowView`] - Stored row with masked secrets (list)
//! - [`KeyInfo`] - Registry entry (keys)

mod output;
mod text;

pub use output::{KeyInfo, ResolvedSetting, SettingRowView};
pub use text::{
    SECRET_MASK, display_value, format_section_badge, format_setting_line, format_source,
};
