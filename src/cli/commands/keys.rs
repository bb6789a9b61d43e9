//! Keys command implementation.
//!
//! Prints the registry: every known key with its section and kind.

use std::str::FromStr;

use strata_lib::{ALL_KEYS, Section};

use crate::cli::KeysArgs;
use crate::error::Result;
use crate::format::KeyInfo;

/// Execute the keys command.
///
/// # Errors
///
/// Returns an error on an unknown section or serialization failure.
pub fn execute(args: &KeysArgs, json: bool) -> Result<()> {
    let section = args
        .section
        .as_deref()
        .map(Section::from_str)
        .transpose()?;

    let infos: Vec<KeyInfo> = ALL_KEYS
        .iter()
        .filter(|key| section.is_none_or(|s| key.section() == s))
        .map(|key| KeyInfo::describe(*key))
        .collect();

    if json {
        println!("{}", serde_json::to_string(&infos)?);
        return Ok(());
    }

    for info in &infos {
        let mut line = format!("{} [{}] {}", info.key, info.section, info.kind);
        if let Some(ref choices) = info.choices {
            line.push_str(&format!(": {}", choices.join("|")));
        }
        println!("{line}");
    }
    println!("{} keys", infos.len());

    Ok(())
}
