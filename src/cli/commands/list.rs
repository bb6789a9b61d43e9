//! List command implementation.
//!
//! Shows the stored rows visible to a scope, with secrets masked.

use std::str::FromStr;

use strata_lib::{ListFilters, Section};

use crate::cli::ListArgs;
use crate::error::Result;
use crate::format::{SettingRowView, format_setting_line};
use crate::storage::SqliteStore;

use super::CommandContext;

/// Execute the list command.
///
/// # Errors
///
/// Returns an error on an unknown section, an uninitialized workspace,
/// or a database failure.
pub fn execute(args: &ListArgs, json: bool) -> Result<()> {
    let section = args
        .section
        .as_deref()
        .map(Section::from_str)
        .transpose()?;

    let ctx = CommandContext::load()?;
    let scope = ctx.resolve_scope(&args.scope)?;
    let store = SqliteStore::open(ctx.db_path())?;

    let filters = ListFilters {
        section,
        key_contains: args.contains.clone(),
        include_company: args.include_company,
        limit: args.limit,
    };
    let rows = store.list(&scope, &filters)?;

    if json {
        let views: Vec<SettingRowView> = rows.iter().map(SettingRowView::from_row).collect();
        println!("{}", serde_json::to_string(&views)?);
    } else if rows.is_empty() {
        println!("No settings stored for {scope}");
    } else {
        for row in &rows {
            println!("{}", format_setting_line(row));
        }
        println!("{} settings ({scope})", rows.len());
    }

    Ok(())
}
