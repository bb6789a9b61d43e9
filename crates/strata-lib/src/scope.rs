//! Scope resolution and lookup policy types.
//!
//! A `Scope` is the `(owner, workspace)` pair a settings row is
//! attached to. `TenantContext` carries who is acting and in which
//! deployment mode; it resolves to a `Scope` explicitly rather than
//! reading ambient state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SettingsError;
use crate::keys::Section;

/// The `(owner, workspace)` pair a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub owner_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<i64>,
}

impl Scope {
    /// Workspace-scoped.
    #[must_use]
    pub const fn workspace(owner_id: i64, workspace_id: i64) -> Self {
        Self {
            owner_id,
            workspace_id: Some(workspace_id),
        }
    }

    /// Company-wide (no workspace).
    #[must_use]
    pub const fn company(owner_id: i64) -> Self {
        Self {
            owner_id,
            workspace_id: None,
        }
    }

    /// The scope a write lands in, honoring `ignore_workspace`.
    #[must_use]
    pub const fn write_target(&self, ignore_workspace: bool) -> Self {
        if ignore_workspace {
            Self {
                owner_id: self.owner_id,
                workspace_id: None,
            }
        } else {
            *self
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.workspace_id {
            Some(ws) => write!(f, "owner {} / workspace {}", self.owner_id, ws),
            None => write!(f, "owner {} / company-wide", self.owner_id),
        }
    }
}

/// Deployment mode for scope resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployMode {
    /// Multiple independent company accounts coexist.
    Saas,
    /// Self-hosted: every setting collapses to the one designated owner.
    SelfHosted { owner_user_id: i64 },
}

impl DeployMode {
    #[must_use]
    pub const fn is_saas(&self) -> bool {
        matches!(self, Self::Saas)
    }
}

/// Who is acting, and where.
///
/// Passed into every settings operation; nothing in the store reads
/// global state. A non-company user (e.g. a superadmin) simply carries
/// `workspace_id = None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantContext {
    pub user_id: i64,
    pub workspace_id: Option<i64>,
    pub is_saas: bool,
}

impl TenantContext {
    #[must_use]
    pub const fn new(user_id: i64, workspace_id: Option<i64>, is_saas: bool) -> Self {
        Self {
            user_id,
            workspace_id,
            is_saas,
        }
    }

    /// Resolve this context to the scope its reads and writes use.
    ///
    /// Self-hosted deployments route every user to the designated
    /// owner's company-wide rows, regardless of who is acting.
    #[must_use]
    pub const fn resolve(&self, mode: DeployMode) -> Scope {
        match mode {
            DeployMode::SelfHosted { owner_user_id } => Scope {
                owner_id: owner_user_id,
                workspace_id: None,
            },
            DeployMode::Saas => Scope {
                owner_id: self.user_id,
                workspace_id: self.workspace_id,
            },
        }
    }
}

/// What a read does when the workspace row is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Fallback {
    /// Fall back to the owner's company-wide row.
    #[default]
    CompanyWide,
    /// Look up the exact scope only.
    Exact,
}

impl Fallback {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CompanyWide => "company-wide",
            Self::Exact => "exact",
        }
    }
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Fallback {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "company-wide" | "company" => Ok(Self::CompanyWide),
            "exact" => Ok(Self::Exact),
            other => Err(SettingsError::validation(
                "fallback",
                format!("expected 'company-wide' or 'exact', got '{other}'"),
            )),
        }
    }
}

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    /// The workspace-scoped row matched.
    Workspace,
    /// The company-wide row matched.
    Company,
    /// No row matched; the caller's default was used.
    Default,
}

/// Filter options for listing stored rows.
#[derive(Debug, Clone, Default)]
pub struct ListFilters {
    /// Restrict to one settings family.
    pub section: Option<Section>,
    /// Substring match on the wire key name.
    pub key_contains: Option<String>,
    /// Include company-wide rows when listing a workspace scope.
    pub include_company: bool,
    pub limit: Option<usize>,
}
