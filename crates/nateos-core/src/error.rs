// ── Core error types ──
//
// Consumers of this crate never see reqwest or serde errors directly. The
// gateway folds every transport failure into a `RemoteFailure`, which
// carries only a coarse cause tag plus a human-readable message.

use std::fmt;

use thiserror::Error;

use crate::model::{DomainId, MutationKind};

/// Why a remote call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    /// No HTTP response was received.
    Network,
    /// The API answered with a non-2xx status.
    Status(u16),
    /// The response body could not be decoded.
    Decode,
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => f.write_str("network"),
            Self::Status(code) => write!(f, "status:{code}"),
            Self::Decode => f.write_str("decode"),
        }
    }
}

/// Normalized failure of a single gateway call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{cause}: {message}")]
pub struct RemoteFailure {
    pub cause: FailureCause,
    pub message: String,
}

impl RemoteFailure {
    pub fn is_network(&self) -> bool {
        self.cause == FailureCause::Network
    }
}

impl From<nateos_api::Error> for RemoteFailure {
    fn from(err: nateos_api::Error) -> Self {
        let cause = match &err {
            nateos_api::Error::Status { status, .. } => FailureCause::Status(*status),
            nateos_api::Error::Deserialization { .. } => FailureCause::Decode,
            nateos_api::Error::Transport(e) if e.is_decode() => FailureCause::Decode,
            nateos_api::Error::Transport(e) => match e.status() {
                Some(status) => FailureCause::Status(status.as_u16()),
                None => FailureCause::Network,
            },
            nateos_api::Error::InvalidUrl(_)
            | nateos_api::Error::UnsupportedBaseUrl(_)
            | nateos_api::Error::Tls(_) => FailureCause::Network,
        };
        Self {
            cause,
            message: err.to_string(),
        }
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Catalog errors ───────────────────────────────────────────────
    #[error("Unknown configuration domain: {0}")]
    UnknownDomain(String),

    // ── Mutation planning errors ─────────────────────────────────────
    #[error("{kind} is not supported for {domain}")]
    UnsupportedMutation { domain: DomainId, kind: MutationKind },

    #[error("{domain} {kind} requires a key")]
    MissingKey { domain: DomainId, kind: MutationKind },

    #[error("{domain} entries are addressed by position, got {key:?}")]
    InvalidIndex { domain: DomainId, key: String },

    #[error("Deleting from {domain} requires confirmation")]
    ConfirmationRequired { domain: DomainId },

    // ── Form errors ──────────────────────────────────────────────────
    #[error("No form is open")]
    NoActiveModal,

    #[error("Form has no field named {0}")]
    UnknownField(String),

    #[error("Invalid value for {field}: {message}")]
    Coercion { field: String, message: String },

    #[error("Forms can only be submitted inside a Tokio runtime")]
    NoRuntime,

    // ── Remote errors ────────────────────────────────────────────────
    #[error("Remote call failed ({0})")]
    Remote(#[from] RemoteFailure),

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl From<nateos_api::Error> for CoreError {
    fn from(err: nateos_api::Error) -> Self {
        match err {
            nateos_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            nateos_api::Error::UnsupportedBaseUrl(url) => CoreError::Config {
                message: format!("URL cannot be used as an API base: {url}"),
            },
            nateos_api::Error::Tls(message) => CoreError::Config { message },
            other => CoreError::Remote(other.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cause_tags_render_compactly() {
        assert_eq!(FailureCause::Network.to_string(), "network");
        assert_eq!(FailureCause::Status(404).to_string(), "status:404");
        assert_eq!(FailureCause::Decode.to_string(), "decode");
    }

    #[test]
    fn api_errors_map_to_causes() {
        let status: RemoteFailure = nateos_api::Error::Status {
            status: 400,
            body: "vlan_id required".into(),
        }
        .into();
        assert_eq!(status.cause, FailureCause::Status(400));

        let decode: RemoteFailure = nateos_api::Error::Deserialization {
            message: "expected value".into(),
            body: "<html>".into(),
        }
        .into();
        assert_eq!(decode.cause, FailureCause::Decode);

        let tls: RemoteFailure = nateos_api::Error::Tls("bad cert".into()).into();
        assert!(tls.is_network());
    }

    #[test]
    fn setup_errors_become_config_errors() {
        let err: CoreError = nateos_api::Error::Tls("invalid CA cert".into()).into();
        assert!(matches!(err, CoreError::Config { .. }));
    }
}
