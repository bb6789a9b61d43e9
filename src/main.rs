//! `strata` - Scoped settings store
//!
//! Resolves per-tenant settings through a workspace → company
//! precedence chain over `SQLite` + JSONL storage.

use strata::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
