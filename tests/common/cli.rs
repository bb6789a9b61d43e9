//! Shared CLI test harness.
//!
//! Runs the `strata` binary inside an isolated temp workspace with the
//! env overrides cleared, so tests cannot see each other or the host.

use std::path::PathBuf;
use std::process::Output;

use assert_cmd::Command;
use tempfile::TempDir;

pub struct StrataWorkspace {
    pub root: PathBuf,
    _tempdir: TempDir,
}

impl StrataWorkspace {
    #[must_use]
    pub fn new() -> Self {
        let tempdir = TempDir::new().expect("create temp workspace");
        Self {
            root: tempdir.path().to_path_buf(),
            _tempdir: tempdir,
        }
    }
}

pub struct CmdOutput {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl From<Output> for CmdOutput {
    fn from(output: Output) -> Self {
        Self {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Run `strata` with the given args inside the workspace.
///
/// The label names the step in panic messages.
pub fn run_strata<'a>(
    workspace: &StrataWorkspace,
    args: impl IntoIterator<Item = &'a str>,
    label: &str,
) -> CmdOutput {
    let output = Command::cargo_bin("strata")
        .expect("strata binary")
        .current_dir(&workspace.root)
        .env_remove("STRATA_MODE")
        .env_remove("STRATA_OWNER")
        .env_remove("STRATA_FALLBACK")
        .env_remove("STRATA_USER")
        .env_remove("STRATA_WORKSPACE")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("spawn strata for step '{label}': {e}"));
    output.into()
}
