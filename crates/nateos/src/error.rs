//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use nateos_config::ConfigError;
use nateos_core::{CoreError, FailureCause};

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the configuration API at {url}")]
    #[diagnostic(
        code(nateos::unreachable),
        help(
            "Check that the device is up and the API is listening.\n\
             URL: {url}\n\
             Try: nateos status --api-url http://<device>:8080/api"
        )
    )]
    Unreachable { url: String },

    #[error("Request to the device failed: {message}")]
    #[diagnostic(code(nateos::network))]
    Network { message: String },

    // ── Remote ───────────────────────────────────────────────────────
    #[error("The device rejected the request (HTTP {status}): {message}")]
    #[diagnostic(code(nateos::rejected))]
    Rejected { status: u16, message: String },

    #[error("{what} not found")]
    #[diagnostic(
        code(nateos::not_found),
        help("Run: nateos show to list current entries")
    )]
    NotFound { what: String },

    #[error("Unexpected response from the device: {message}")]
    #[diagnostic(code(nateos::decode))]
    Decode { message: String },

    // ── Usage ────────────────────────────────────────────────────────
    #[error("Unknown configuration domain '{name}'")]
    #[diagnostic(
        code(nateos::unknown_domain),
        help("Run: nateos domains to list them")
    )]
    UnknownDomain { name: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(nateos::validation))]
    Validation { field: String, reason: String },

    #[error("{0}")]
    #[diagnostic(code(nateos::unsupported))]
    Unsupported(String),

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(nateos::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(nateos::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: nateos config init --name {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(nateos::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    #[diagnostic(code(nateos::encode))]
    Encode(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Unreachable { .. } | Self::Network { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::UnknownDomain { .. }
            | Self::Validation { .. }
            | Self::Unsupported(_)
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::UnknownProfile { name } => Self::ProfileNotFound {
                name,
                available: String::new(),
            },
            other => Self::Config(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownDomain(name) => Self::UnknownDomain { name },

            CoreError::UnsupportedMutation { .. }
            | CoreError::MissingKey { .. }
            | CoreError::ConfirmationRequired { .. }
            | CoreError::NoActiveModal
            | CoreError::NoRuntime => Self::Unsupported(err.to_string()),

            CoreError::InvalidIndex { domain, key } => Self::Validation {
                field: format!("{domain} position"),
                reason: format!("expected a number, got {key:?}"),
            },

            CoreError::UnknownField(field) => Self::Validation {
                reason: "no such field on this form".into(),
                field,
            },

            CoreError::Coercion { field, message } => Self::Validation {
                field,
                reason: message,
            },

            CoreError::Remote(failure) => match failure.cause {
                FailureCause::Network => Self::Network {
                    message: failure.message,
                },
                FailureCause::Status(404) => Self::NotFound {
                    what: "Entry".into(),
                },
                FailureCause::Status(status) => Self::Rejected {
                    status,
                    message: failure.message,
                },
                FailureCause::Decode => Self::Decode {
                    message: failure.message,
                },
            },

            CoreError::Config { message } => Self::Validation {
                field: "connection".into(),
                reason: message,
            },
        }
    }
}
