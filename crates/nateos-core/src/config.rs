// ── Runtime connection configuration ──
//
// Describes how to reach the device's configuration API. Never touches
// disk: the CLI builds a `ConsoleConfig` (usually via `nateos-config`) and
// hands it in.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed lab devices).
    DangerAcceptInvalid,
}

/// Configuration for one console session against one device.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// API base URL (e.g. `http://localhost:8080/api`).
    pub api_url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout for loads and writes.
    pub timeout: Duration,
    /// Timeout for the liveness probe.
    pub probe_timeout: Duration,
}

impl ConsoleConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            ..Self::default()
        }
    }

    pub(crate) fn transport(&self) -> nateos_api::TransportConfig {
        nateos_api::TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => nateos_api::TlsMode::System,
                TlsVerification::CustomCa(path) => nateos_api::TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => nateos_api::TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(10),
            probe_timeout: Duration::from_secs(3),
        }
    }
}

/// `http://localhost:8080/api`
pub fn default_api_url() -> Url {
    Url::parse(nateos_api::DEFAULT_BASE_URL).expect("invalid default API URL")
}
