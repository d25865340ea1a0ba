//! Terminal output for CLI commands.
//!
//! Every command produces one serializable result. `--format json` prints
//! that value as-is for scripting; the table format hands it to a
//! command-specific renderer.

use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print `value` as JSON, or call `render` for the human format.
pub fn emit<T: Serialize>(format: OutputFormat, value: &T, render: impl FnOnce(&T)) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => print_error(&format!("Failed to encode output: {e}")),
        },
        OutputFormat::Table => render(value),
    }
}

/// Print rows as a table, or as a JSON array.
pub fn print_rows<T: Serialize + Tabled>(rows: &[T], format: OutputFormat) {
    emit(format, &rows, |rows| {
        if rows.is_empty() {
            println!("Nothing to show.");
        } else {
            println!("{}", Table::new(rows.iter()).with(Style::rounded()));
        }
    });
}

/// Print an aligned `key: value` line.
pub fn print_field(key: &str, value: impl std::fmt::Display) {
    println!("  {:<20} {}", format!("{key}:"), value);
}

pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

pub fn print_warning(msg: &str) {
    eprintln!("⚠ {msg}");
}

pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}
