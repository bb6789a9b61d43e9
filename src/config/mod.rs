//! Deployment configuration for `strata`.
//!
//! Configuration is loaded from YAML with support for:
//! - Workspace config (.strata/config.yaml)
//! - Environment variable overrides (`STRATA_MODE`, `STRATA_OWNER`,
//!   `STRATA_FALLBACK`)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strata_lib::{DeployMode, Fallback};

use crate::error::{Result, StrataError};

/// Workspace data directory name.
pub const STRATA_DIR: &str = ".strata";
/// Database file name inside the data directory.
pub const DB_FILE: &str = "settings.db";
/// JSONL export file name inside the data directory.
pub const JSONL_FILE: &str = "settings.jsonl";
/// Config file name inside the data directory.
pub const CONFIG_FILE: &str = "config.yaml";

/// Deployment mode as written in config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    #[default]
    Saas,
    SelfHosted,
}

/// Deployment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `saas` or `self-hosted`.
    pub mode: Mode,
    /// Designated owner user id for self-hosted deployments.
    pub owner_user_id: i64,
    /// Read fallback policy: `company-wide` or `exact`.
    pub fallback: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Saas,
            owner_user_id: 1,
            fallback: Fallback::CompanyWide.as_str().to_string(),
        }
    }
}

impl Config {
    /// Load configuration for a workspace root, applying env overrides.
    ///
    /// A missing config file yields defaults; a malformed one is an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns `Config` on unreadable or malformed YAML, or on an
    /// invalid env override.
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::path(root);
        let mut config = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_yaml::from_str(&raw)
                .map_err(|e| StrataError::config(format!("{}: {e}", path.display())))?
        } else {
            Self::default()
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Write this configuration to the workspace config file.
    ///
    /// # Errors
    ///
    /// Returns `Io` on write failure.
    pub fn save(&self, root: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| StrataError::config(format!("serialize config: {e}")))?;
        fs::write(Self::path(root), yaml)?;
        Ok(())
    }

    /// The deploy mode this configuration resolves to.
    #[must_use]
    pub const fn deploy_mode(&self) -> DeployMode {
        match self.mode {
            Mode::Saas => DeployMode::Saas,
            Mode::SelfHosted => DeployMode::SelfHosted {
                owner_user_id: self.owner_user_id,
            },
        }
    }

    /// The configured read fallback policy.
    ///
    /// # Errors
    ///
    /// Returns `Config` when the configured value is not a policy.
    pub fn fallback(&self) -> Result<Fallback> {
        self.fallback
            .parse()
            .map_err(|_| StrataError::config(format!("invalid fallback '{}'", self.fallback)))
    }

    #[must_use]
    pub fn path(root: &Path) -> PathBuf {
        root.join(STRATA_DIR).join(CONFIG_FILE)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(mode) = std::env::var("STRATA_MODE") {
            self.mode = match mode.trim().to_lowercase().as_str() {
                "saas" => Mode::Saas,
                "self-hosted" | "selfhosted" => Mode::SelfHosted,
                other => {
                    return Err(StrataError::config(format!("invalid STRATA_MODE '{other}'")));
                }
            };
        }
        if let Ok(owner) = std::env::var("STRATA_OWNER") {
            self.owner_user_id = owner
                .trim()
                .parse()
                .map_err(|_| StrataError::config(format!("invalid STRATA_OWNER '{owner}'")))?;
        }
        if let Ok(fallback) = std::env::var("STRATA_FALLBACK") {
            self.fallback = fallback;
            // Validate eagerly so a bad override fails at startup.
            self.fallback()?;
        }
        Ok(())
    }
}

/// Locate the `.strata` data directory under a workspace root.
///
/// # Errors
///
/// Returns `NotInitialized` when the directory does not exist.
pub fn data_dir(root: &Path) -> Result<PathBuf> {
    let dir = root.join(STRATA_DIR);
    if dir.is_dir() {
        Ok(dir)
    } else {
        Err(StrataError::NotInitialized)
    }
}
