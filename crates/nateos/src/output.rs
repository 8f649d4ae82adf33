//! Output formatting: table, JSON, YAML, plain.
//!
//! Tables are built row by row from domain descriptors with `tabled`'s
//! builder, structured formats go through serde, and plain emits one
//! value per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use nateos_core::{Notification, NotificationKind};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Serialize `data` for the structured formats.
///
/// Returns `Ok(None)` for `table` and `plain`, which the caller renders
/// from its own rows.
pub fn render_structured<T: Serialize + ?Sized>(
    format: OutputFormat,
    data: &T,
) -> Result<Option<String>, CliError> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(data).map_err(encode_err)?,
        OutputFormat::JsonCompact => serde_json::to_string(data).map_err(encode_err)?,
        OutputFormat::Yaml => serde_yaml::to_string(data).map_err(encode_err)?,
        OutputFormat::Table | OutputFormat::Plain => return Ok(None),
    };
    Ok(Some(text))
}

#[allow(clippy::needless_pass_by_value)]
fn encode_err(e: impl std::fmt::Display) -> CliError {
    CliError::Encode(e.to_string())
}

/// Rounded table from a header row and string cells.
pub fn render_table(header: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut builder = Builder::default();
    builder.push_record(header.iter().map(|h| (*h).to_owned()));
    for row in rows {
        builder.push_record(row);
    }
    builder.build().with(Style::rounded()).to_string()
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Notifications ────────────────────────────────────────────────────

/// Print outcome messages to stderr, oldest first. Failures are printed
/// even in quiet mode.
pub fn print_notifications(entries: &[Notification], quiet: bool, color: bool) {
    let mut stderr = io::stderr().lock();
    for entry in entries.iter().rev() {
        let line = match (entry.kind, color) {
            (NotificationKind::Success, _) if quiet => continue,
            (NotificationKind::Success, true) => format!("{} {}", "✓".green(), entry.message),
            (NotificationKind::Success, false) => format!("✓ {}", entry.message),
            (NotificationKind::Failure, true) => {
                format!("{} {}", "✗".red(), entry.message.red())
            }
            (NotificationKind::Failure, false) => format!("✗ {}", entry.message),
        };
        let _ = writeln!(stderr, "{line}");
    }
}
