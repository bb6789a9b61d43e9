//! Text formatting functions for `strata`.
//!
//! Provides plain text (non-ANSI) formatting for terminal output:
//! - Section badges ([currency], [email], ...)
//! - Secret masking
//! - Setting line formatting

use strata_lib::{Setting, SettingKey, ValueSource};

/// Fixed mask shown in place of secret values.
pub const SECRET_MASK: &str = "••••••••";

/// Format a section as a bracketed badge.
#[must_use]
pub fn format_section_badge(key: SettingKey) -> String {
    format!("[{}]", key.section().as_str())
}

/// The value as shown to a human: secrets are masked, everything else
/// verbatim.
#[must_use]
pub fn display_value(key: SettingKey, value: &str) -> String {
    if key.kind().is_secret() {
        SECRET_MASK.to_string()
    } else {
        value.to_string()
    }
}

/// Human label for a resolution source.
#[must_use]
pub const fn format_source(source: ValueSource) -> &'static str {
    match source {
        ValueSource::Workspace => "workspace",
        ValueSource::Company => "company",
        ValueSource::Default => "default",
    }
}

/// Format a single-line setting summary.
///
/// Format: `{key} [{section}] = {value}` with a workspace suffix for
/// workspace-scoped rows.
#[must_use]
pub fn format_setting_line(row: &Setting) -> String {
    let mut line = format!(
        "{} {} = {}",
        row.key,
        format_section_badge(row.key),
        display_value(row.key, &row.value),
    );
    if let Some(ws) = row.workspace_id {
        line.push_str(&format!("  (workspace {ws})"));
    }
    line
}
