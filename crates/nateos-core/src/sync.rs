// ── Sync orchestrator ──
//
// Populates domain views from the remote store. The full-catalog load fans
// out one request per domain; each completion lands on its own. Load
// failures are logged and leave the previous view in place.

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::error::RemoteFailure;
use crate::gateway::RemoteGateway;
use crate::model::{DomainId, catalog, describe};
use crate::store::ViewStore;

/// Outcome of a multi-domain load.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<DomainId>,
    pub failed: Vec<(DomainId, RemoteFailure)>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Clone)]
pub struct SyncOrchestrator {
    gateway: RemoteGateway,
    views: Arc<ViewStore>,
}

impl SyncOrchestrator {
    pub fn new(gateway: RemoteGateway, views: Arc<ViewStore>) -> Self {
        Self { gateway, views }
    }

    pub fn views(&self) -> &ViewStore {
        &self.views
    }

    /// Load every catalog domain concurrently.
    pub async fn load_all(&self) -> LoadReport {
        let domains: Vec<DomainId> = catalog().map(|d| d.id).collect();
        let report = self.load_many(&domains).await;
        debug!(
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            "initial load finished"
        );
        report
    }

    /// Load a chosen set of domains concurrently, in one task.
    pub async fn load_many(&self, domains: &[DomainId]) -> LoadReport {
        let results = join_all(domains.iter().map(|&d| self.reload(d))).await;

        let mut report = LoadReport::default();
        for (&domain, result) in domains.iter().zip(results) {
            match result {
                Ok(_) => report.loaded.push(domain),
                Err(failure) => report.failed.push((domain, failure)),
            }
        }
        report
    }

    /// Re-fetch one domain. Returns `Ok(false)` when a newer load for the
    /// same domain had already landed and this response was discarded.
    pub async fn reload(&self, domain: DomainId) -> Result<bool, RemoteFailure> {
        let descriptor = describe(domain);
        let ticket = self.views.begin(domain);

        match self.gateway.load(descriptor).await {
            Ok(state) => {
                let applied = self.views.apply(ticket, state);
                if !applied {
                    debug!(%domain, "discarding stale load");
                }
                Ok(applied)
            }
            Err(failure) => {
                warn!(%domain, error = %failure, "failed to load domain");
                Err(failure)
            }
        }
    }
}
