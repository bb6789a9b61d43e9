//! Init command implementation.

use std::fs;
use std::path::Path;

use crate::cli::InitArgs;
use crate::config::{Config, Mode, STRATA_DIR};
use crate::error::{Result, StrataError};
use crate::storage::SqliteStore;

/// Execute the init command.
///
/// # Errors
///
/// Returns an error if the mode is invalid or the data directory /
/// database cannot be created.
pub fn execute(args: &InitArgs, json: bool) -> Result<()> {
    let mode = match args.mode.trim().to_lowercase().as_str() {
        "saas" => Mode::Saas,
        "self-hosted" | "selfhosted" => Mode::SelfHosted,
        other => {
            return Err(StrataError::config(format!(
                "invalid mode '{other}' (expected saas or self-hosted)"
            )));
        }
    };

    let root = Path::new(".");
    let dir = root.join(STRATA_DIR);
    if dir.exists() {
        println!("Already initialized ({})", dir.display());
        return Ok(());
    }
    fs::create_dir_all(&dir)?;

    let config = Config {
        mode,
        owner_user_id: args.owner.unwrap_or(1),
        ..Default::default()
    };
    config.save(root)?;

    // Creating the store lays down the schema.
    let db_path = dir.join(crate::config::DB_FILE);
    SqliteStore::open(&db_path)?;

    if json {
        println!(
            "{}",
            serde_json::to_string(&serde_json::json!({
                "initialized": true,
                "mode": args.mode.trim().to_lowercase(),
                "owner_user_id": config.owner_user_id,
                "db": db_path.display().to_string(),
            }))?
        );
    } else {
        println!("Initialized {} ({} mode)", dir.display(), config_mode_str(mode));
    }

    Ok(())
}

const fn config_mode_str(mode: Mode) -> &'static str {
    match mode {
        Mode::Saas => "saas",
        Mode::SelfHosted => "self-hosted",
    }
}
