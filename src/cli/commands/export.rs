//! Export command implementation.
//!
//! Writes every stored row to JSONL, interoperable with
//! `strata_lib::InMemoryStore::open`.

use std::path::PathBuf;

use strata_lib::jsonl;

use crate::cli::ExportArgs;
use crate::error::Result;
use crate::storage::SqliteStore;

use super::CommandContext;

/// Execute the export command.
///
/// # Errors
///
/// Returns an error on an uninitialized workspace, a database failure,
/// or a write failure.
pub fn execute(args: &ExportArgs, json: bool) -> Result<()> {
    let ctx = CommandContext::load()?;
    let store = SqliteStore::open(ctx.db_path())?;

    let rows = store.all_rows()?;
    let path = args
        .output
        .as_ref()
        .map_or_else(|| ctx.jsonl_path(), PathBuf::from);
    jsonl::save(&path, &rows)?;

    if json {
        println!(
            "{}",
            serde_json::to_string(&serde_json::json!({
                "exported": rows.len(),
                "path": path.display().to_string(),
            }))?
        );
    } else {
        println!("Exported {} rows to {}", rows.len(), path.display());
    }

    Ok(())
}
