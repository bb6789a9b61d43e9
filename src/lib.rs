//! `strata` - Scoped settings store library
//!
//! This crate provides the core functionality for the `strata` CLI
//! tool, a multi-tenant settings store with workspace → company
//! precedence.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Deployment configuration (mode, owner, fallback)
//! - [`storage`] - `SQLite` database layer
//! - [`error`] - Error types and handling
//! - [`format`] - Output formatting (text, JSON)
//! - [`validation`] - Form/value boundary validation
//!
//! Row models, the key registry, and the in-process store live in the
//! `strata-lib` crate.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod storage;
pub mod validation;

pub use error::{Result, StrataError};

/// Run the CLI application.
///
/// This is the main entry point called from `main()`.
///
/// # Errors
///
/// Returns an error if command execution fails.
pub fn run() -> anyhow::Result<()> {
    cli::run()
}
