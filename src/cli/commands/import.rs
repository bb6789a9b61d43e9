//! Import command implementation.
//!
//! Loads a JSONL export into the database in one transaction.

use std::path::PathBuf;

use strata_lib::jsonl;

use crate::cli::ImportArgs;
use crate::error::Result;
use crate::storage::SqliteStore;

use super::CommandContext;

/// Execute the import command.
///
/// # Errors
///
/// Returns an error on a missing or malformed input file (including
/// lines carrying unknown keys), an uninitialized workspace, or a
/// database failure. A failed import writes nothing.
pub fn execute(args: &ImportArgs, json: bool) -> Result<()> {
    let ctx = CommandContext::load()?;
    let path = args
        .input
        .as_ref()
        .map_or_else(|| ctx.jsonl_path(), PathBuf::from);

    let rows: Vec<_> = jsonl::load(&path)?.into_iter().map(|(_, row)| row).collect();

    let mut store = SqliteStore::open(ctx.db_path())?;
    let imported = store.import(&rows)?;

    if json {
        println!(
            "{}",
            serde_json::to_string(&serde_json::json!({
                "imported": imported,
                "path": path.display().to_string(),
            }))?
        );
    } else {
        println!("Imported {} rows from {}", imported, path.display());
    }

    Ok(())
}
