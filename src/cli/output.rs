//! Output helpers shared by the command handlers.

use colored::Colorize;
use serde::Serialize;

use crate::error::Result;

/// Pretty-print a serializable value as JSON on stdout (robot mode).
pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Section heading for human output.
pub fn heading(text: &str) {
    println!("{}", text.bold());
}

/// Indented key/value line for human output.
pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {}: {}", label.dimmed(), value);
}
