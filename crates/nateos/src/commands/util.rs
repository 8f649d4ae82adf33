//! Shared helpers for command handlers.

use std::io::IsTerminal;

use nateos_core::{Console, DomainId};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Parse a domain argument, accepting the short aliases.
pub fn parse_domain(name: &str) -> Result<DomainId, CliError> {
    Ok(DomainId::parse(name)?)
}

/// Split `FIELD=VALUE`. The value may be empty (clears an optional field).
pub fn parse_assignment(arg: &str) -> Result<(&str, &str), CliError> {
    match arg.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => Ok((field.trim(), value)),
        _ => Err(CliError::Validation {
            field: arg.into(),
            reason: "expected FIELD=VALUE".into(),
        }),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to ask on, refuses instead of guessing.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.trim_end_matches('?').into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)?;
    Ok(confirmed)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Drain the console's live notifications to stderr.
pub fn report_outcome(console: &Console, global: &GlobalOpts) {
    output::print_notifications(
        &console.notifications().entries(),
        global.quiet,
        output::should_color(global.color),
    );
}
