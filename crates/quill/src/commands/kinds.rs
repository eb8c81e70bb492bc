//! `quill kinds` command implementation.

use std::fmt::Write as _;
use std::io::Write;

use clap::Args;
use quill_render::{KindInfo, REGISTRY};

use crate::error::CliError;

/// Arguments for the kinds command.
#[derive(Args)]
pub(crate) struct KindsArgs {
    /// Print the registry as JSON.
    #[arg(long)]
    json: bool,
}

impl KindsArgs {
    /// Execute the kinds command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let listing = if self.json {
            let mut json = serde_json::to_string_pretty(&REGISTRY[..])?;
            json.push('\n');
            json
        } else {
            format_table(&REGISTRY)
        };
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(listing.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

/// One line per kind: method name, category, fallback.
fn format_table(kinds: &[KindInfo]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<16} {:<9} FALLBACK", "KIND", "CATEGORY");
    for info in kinds {
        let _ = writeln!(
            out,
            "{:<16} {:<9} {}",
            info.name,
            info.category.to_string(),
            info.fallback
        );
    }
    out
}
