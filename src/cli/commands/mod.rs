//! Command implementations.

pub mod apply;
pub mod doctor;
pub mod export;
pub mod get;
pub mod import;
pub mod init;
pub mod keys;
pub mod list;
pub mod set;
pub mod version;

use std::path::{Path, PathBuf};

use strata_lib::{Scope, TenantContext};

use crate::cli::ScopeArgs;
use crate::config::{self, Config, DB_FILE, JSONL_FILE};
use crate::error::{Result, StrataError};

/// Everything a data command needs: the loaded config and the data
/// directory paths.
pub struct CommandContext {
    pub config: Config,
    pub data_dir: PathBuf,
}

impl CommandContext {
    /// Load the context for the current working directory.
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized` when no `.strata` directory exists, or
    /// `Config` on a malformed config file.
    pub fn load() -> Result<Self> {
        let root = Path::new(".");
        let data_dir = config::data_dir(root)?;
        let config = Config::load(root)?;
        Ok(Self { config, data_dir })
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }

    #[must_use]
    pub fn jsonl_path(&self) -> PathBuf {
        self.data_dir.join(JSONL_FILE)
    }

    /// Resolve the scope the command acts on.
    ///
    /// In SaaS mode the acting user is required; in self-hosted mode
    /// every caller collapses to the designated owner, so `--user` may
    /// be omitted.
    ///
    /// # Errors
    ///
    /// Returns `Config` when SaaS mode is missing an acting user.
    pub fn resolve_scope(&self, args: &ScopeArgs) -> Result<Scope> {
        let mode = self.config.deploy_mode();
        let user_id = match args.user {
            Some(id) => id,
            None if mode.is_saas() => {
                return Err(StrataError::config(
                    "--user is required in saas mode (or set STRATA_USER)",
                ));
            }
            // Self-hosted: the acting user is irrelevant.
            None => 0,
        };
        let ctx = TenantContext::new(user_id, args.workspace, mode.is_saas());
        Ok(ctx.resolve(mode))
    }
}
