//! Get command implementation.

use std::str::FromStr;

use strata_lib::{SettingKey, ValueSource};

use crate::cli::GetArgs;
use crate::error::Result;
use crate::format::{ResolvedSetting, format_source};
use crate::storage::SqliteStore;

use super::CommandContext;

/// Execute the get command.
///
/// # Errors
///
/// Returns an error on an unknown key, an uninitialized workspace, or
/// a database failure. A missing row is not an error; the `--default`
/// value is printed instead.
pub fn execute(args: &GetArgs, json: bool) -> Result<()> {
    let key = SettingKey::from_str(&args.key)?;

    let ctx = CommandContext::load()?;
    let scope = ctx.resolve_scope(&args.scope)?;
    let fallback = ctx.config.fallback()?;

    let store = SqliteStore::open(ctx.db_path())?;
    let resolved = store.resolve(key, &scope, fallback)?;

    let (value, source) = resolved.map_or_else(
        || (args.default.clone(), ValueSource::Default),
        |(row, source)| (row.value, source),
    );

    if json {
        let output = ResolvedSetting {
            key,
            value,
            source,
            scope,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{value}");
        tracing::info!(key = key.as_str(), source = format_source(source), "resolved");
    }

    Ok(())
}
