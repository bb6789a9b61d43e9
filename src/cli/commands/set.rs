//! Set command implementation.

use std::str::FromStr;

use strata_lib::SettingKey;
use strata_lib::error::SettingsError;

use crate::cli::SetArgs;
use crate::error::Result;
use crate::format::display_value;
use crate::storage::SqliteStore;
use crate::validation::ValueValidator;

use super::CommandContext;

/// Execute the set command.
///
/// # Errors
///
/// Returns an error on an unknown key, a value that fails validation,
/// or a database failure.
pub fn execute(args: &SetArgs, json: bool) -> Result<()> {
    // 1. Parse key and value against the registry
    let key = SettingKey::from_str(&args.key)?;
    let value = key.parse_value(&args.value)?;
    ValueValidator::validate(key, &value)
        .map_err(SettingsError::from_validation_errors)?;

    // 2. Resolve scope and open storage
    let ctx = CommandContext::load()?;
    let scope = ctx.resolve_scope(&args.scope)?;
    let mut store = SqliteStore::open(ctx.db_path())?;

    // 3. Upsert
    let row = store.update(key, &value, &scope, args.ignore_workspace)?;

    // 4. Output
    if json {
        println!("{}", serde_json::to_string(&row)?);
    } else {
        println!(
            "Set {} = {} ({})",
            row.key,
            display_value(row.key, &row.value),
            row.workspace_id
                .map_or_else(|| "company-wide".to_string(), |ws| format!("workspace {ws}")),
        );
    }

    Ok(())
}
