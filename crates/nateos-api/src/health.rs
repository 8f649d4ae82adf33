// Liveness and whole-store endpoints

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;

/// Body of the liveness endpoint, e.g. `{"status": "ok", "service": "nateos-api"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

impl ApiClient {
    /// Probe the API.
    ///
    /// `GET /health`
    ///
    /// `timeout` overrides the client-wide timeout for this request only.
    pub async fn health(&self, timeout: Option<Duration>) -> Result<HealthStatus, Error> {
        let url = self.resource_url("health", None)?;
        debug!("GET {}", url);

        let mut builder = self.http_client().get(url);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let resp = builder.send().await.map_err(Error::Transport)?;
        Self::parse_json(resp).await
    }

    /// Fetch the entire running configuration.
    ///
    /// `GET /config`
    ///
    /// Loosely typed: the document nests every layer's sections.
    pub async fn running_config(&self) -> Result<Value, Error> {
        debug!("fetching running config");
        self.get_json("config").await
    }
}
