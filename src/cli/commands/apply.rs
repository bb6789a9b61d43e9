//! Apply command implementation.
//!
//! Reads a whole settings form (a JSON object of key → value) and
//! writes it in one transaction. One bad field rejects the entire form.

use std::fs;
use std::io::Read;

use strata_lib::error::SettingsError;

use crate::cli::ApplyArgs;
use crate::error::{Result, StrataError};
use crate::storage::SqliteStore;
use crate::validation::FormValidator;

use super::CommandContext;

/// Execute the apply command.
///
/// # Errors
///
/// Returns an error when the input is not a JSON object, any field
/// fails validation (all offending fields are listed), or the write
/// fails. No row is written unless every field is valid.
pub fn execute(args: &ApplyArgs, json: bool) -> Result<()> {
    // 1. Read the form
    let raw = if args.file == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(&args.file)?
    };

    let parsed: serde_json::Value = serde_json::from_str(&raw)?;
    let object = parsed
        .as_object()
        .ok_or_else(|| StrataError::config("apply input must be a JSON object"))?;

    // 2. Validate every field before touching storage
    let entries =
        FormValidator::parse_object(object).map_err(SettingsError::from_validation_errors)?;

    // 3. Write the batch atomically
    let ctx = CommandContext::load()?;
    let scope = ctx.resolve_scope(&args.scope)?;
    let mut store = SqliteStore::open(ctx.db_path())?;
    let written = store.update_many(&entries, &scope, args.ignore_workspace)?;

    // 4. Output
    if json {
        println!(
            "{}",
            serde_json::to_string(&serde_json::json!({
                "written": written,
                "scope": scope,
            }))?
        );
    } else {
        println!("Applied {written} settings ({scope})");
    }

    Ok(())
}
