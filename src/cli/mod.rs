//! Command-line interface for `strata`.
//!
//! This module provides the CLI parsing and command routing using clap.

pub mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::logging;

/// `strata` - Scoped settings store.
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(
    author,
    version,
    about = "Scoped settings store for multi-tenant deployments (SQLite + JSONL)",
    long_about = None,
    after_help = "Reads resolve workspace overrides before company-wide rows; \
                  self-hosted deployments collapse to one designated owner."
)]
pub struct Cli {
    /// Output format: text (default) or json
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a strata workspace
    Init(InitArgs),

    /// Resolve a setting value
    Get(GetArgs),

    /// Write one setting
    Set(SetArgs),

    /// Apply a settings form (JSON object) atomically
    Apply(ApplyArgs),

    /// List stored settings for a scope
    List(ListArgs),

    /// List the known setting keys
    Keys(KeysArgs),

    /// Export all rows to JSONL
    Export(ExportArgs),

    /// Import rows from JSONL
    Import(ImportArgs),

    /// Check workspace health
    Doctor,

    /// Show version information
    Version(VersionArgs),
}

/// Scope selection shared by data commands.
#[derive(Args, Debug, Clone)]
pub struct ScopeArgs {
    /// Acting user id
    #[arg(long, env = "STRATA_USER")]
    pub user: Option<i64>,

    /// Current workspace id (omit for company-wide)
    #[arg(long, env = "STRATA_WORKSPACE")]
    pub workspace: Option<i64>,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Deployment mode: saas or self-hosted
    #[arg(long, default_value = "saas")]
    pub mode: String,

    /// Designated owner user id (self-hosted)
    #[arg(long)]
    pub owner: Option<i64>,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Setting key
    pub key: String,

    /// Value returned when no row matches
    #[arg(long, default_value = "")]
    pub default: String,

    #[command(flatten)]
    pub scope: ScopeArgs,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Setting key
    pub key: String,

    /// Raw value (parsed according to the key's kind)
    pub value: String,

    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Write the company-wide row even when a workspace is set
    #[arg(long)]
    pub ignore_workspace: bool,
}

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// JSON object file ("-" for stdin)
    #[arg(long, short, default_value = "-")]
    pub file: String,

    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Write company-wide rows even when a workspace is set
    #[arg(long)]
    pub ignore_workspace: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Restrict to one section (currency, email, ...)
    #[arg(long)]
    pub section: Option<String>,

    /// Substring match on key names
    #[arg(long)]
    pub contains: Option<String>,

    /// Include company-wide rows when listing a workspace scope
    #[arg(long)]
    pub include_company: bool,

    /// Maximum rows to print
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Args, Debug)]
pub struct KeysArgs {
    /// Restrict to one section (currency, email, ...)
    #[arg(long)]
    pub section: Option<String>,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output path (defaults to .strata/settings.jsonl)
    #[arg(long, short)]
    pub output: Option<String>,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Input path (defaults to .strata/settings.jsonl)
    #[arg(long, short)]
    pub input: Option<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output only the version number
    #[arg(long)]
    pub short: bool,
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet, None)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    match cli.command {
        Some(Commands::Init(args)) => commands::init::execute(&args, cli.json)?,
        Some(Commands::Get(args)) => commands::get::execute(&args, cli.json)?,
        Some(Commands::Set(args)) => commands::set::execute(&args, cli.json)?,
        Some(Commands::Apply(args)) => commands::apply::execute(&args, cli.json)?,
        Some(Commands::List(args)) => commands::list::execute(&args, cli.json)?,
        Some(Commands::Keys(args)) => commands::keys::execute(&args, cli.json)?,
        Some(Commands::Export(args)) => commands::export::execute(&args, cli.json)?,
        Some(Commands::Import(args)) => commands::import::execute(&args, cli.json)?,
        Some(Commands::Doctor) => commands::doctor::execute(cli.json)?,
        Some(Commands::Version(args)) => commands::version::execute(&args, cli.json)?,
        None => println!("strata - Scoped settings store. Use --help for usage."),
    }

    Ok(())
}
