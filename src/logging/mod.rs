//! Logging initialization for `strata`.
//!
//! Diagnostics go to stderr so stdout stays clean for command output
//! (and for `--json` consumers). Verbosity is driven by `-v` counts;
//! `RUST_LOG` overrides everything when set.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Levels: `--quiet` → error, default → warn, `-v` → info,
/// `-vv` → debug, `-vvv` → trace.
///
/// # Errors
///
/// Returns an error if the subscriber is already set or the log file
/// cannot be created.
pub fn init_logging(
    verbose: u8,
    quiet: bool,
    log_file: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder.with_writer(Mutex::new(file)).try_init()?;
        }
        None => {
            builder.with_writer(std::io::stderr).try_init()?;
        }
    }

    Ok(())
}
