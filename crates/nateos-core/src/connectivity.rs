// ── Connectivity monitor ──
//
// A single liveness probe drives a reachable/unreachable flag. The flag
// is presentation-only and never touches domain views.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info};

use nateos_api::ApiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Reachability {
    #[strum(to_string = "Connected")]
    Reachable,
    #[strum(to_string = "Disconnected")]
    Unreachable,
}

impl Reachability {
    pub fn is_reachable(self) -> bool {
        self == Self::Reachable
    }
}

#[derive(Clone)]
pub struct ConnectivityMonitor {
    client: ApiClient,
    timeout: Duration,
    flag: Arc<watch::Sender<Reachability>>,
}

impl ConnectivityMonitor {
    pub fn new(client: ApiClient, timeout: Duration) -> Self {
        let (flag, _) = watch::channel(Reachability::Unreachable);
        Self {
            client,
            timeout,
            flag: Arc::new(flag),
        }
    }

    pub(crate) fn flag(&self) -> Arc<watch::Sender<Reachability>> {
        Arc::clone(&self.flag)
    }

    /// Probe `/health` once and record the outcome.
    ///
    /// Any failure (connect error, timeout, non-2xx, undecodable body, or a
    /// status other than `ok`) counts as unreachable.
    pub async fn probe(&self) -> Reachability {
        let reachability = match self.client.health(Some(self.timeout)).await {
            Ok(health) if health.is_ok() => {
                info!(service = health.service.as_deref().unwrap_or("unknown"), "API reachable");
                Reachability::Reachable
            }
            Ok(health) => {
                debug!(status = %health.status, "health endpoint reported a problem");
                Reachability::Unreachable
            }
            Err(e) => {
                debug!(error = %e, "health probe failed");
                Reachability::Unreachable
            }
        };
        self.flag.send_replace(reachability);
        reachability
    }

    pub fn current(&self) -> Reachability {
        *self.flag.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Reachability> {
        self.flag.subscribe()
    }
}
