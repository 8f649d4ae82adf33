// ── Console facade ──
//
// Wires the gateway, view store, sync orchestrator, mutation gateway,
// notification feed and connectivity monitor into one cloneable handle.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{Mutex, MutexGuard, watch};
use tracing::info;

use nateos_api::ApiClient;

use crate::config::ConsoleConfig;
use crate::connectivity::{ConnectivityMonitor, Reachability};
use crate::error::CoreError;
use crate::gateway::RemoteGateway;
use crate::modal::ModalController;
use crate::model::DomainId;
use crate::mutation::{Mutation, MutationGateway, MutationResult, PendingDelete};
use crate::notify::NotificationChannel;
use crate::store::{DomainView, ViewStore};
use crate::sync::{LoadReport, SyncOrchestrator};

/// What startup found.
#[derive(Debug)]
pub struct StartReport {
    pub reachability: Reachability,
    pub load: LoadReport,
}

/// Handle to one console session. Cheaply cloneable.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    config: ConsoleConfig,
    gateway: RemoteGateway,
    views: Arc<ViewStore>,
    sync: SyncOrchestrator,
    mutations: MutationGateway,
    notifications: NotificationChannel,
    connectivity: ConnectivityMonitor,
    modal: Mutex<ModalController>,
}

impl Console {
    /// Build a console from connection settings. Does no I/O.
    pub fn new(config: ConsoleConfig) -> Result<Self, CoreError> {
        let client = ApiClient::new(config.api_url.clone(), &config.transport())?;
        Ok(Self::with_client(config, client))
    }

    /// Build a console around an existing API client.
    pub fn with_client(config: ConsoleConfig, client: ApiClient) -> Self {
        let connectivity = ConnectivityMonitor::new(client.clone(), config.probe_timeout);
        let gateway = RemoteGateway::new(client).with_reachability(connectivity.flag());
        let views = Arc::new(ViewStore::new());
        let sync = SyncOrchestrator::new(gateway.clone(), Arc::clone(&views));
        let notifications = NotificationChannel::new();
        let mutations = MutationGateway::new(gateway.clone(), sync.clone(), notifications.clone());
        let modal = Mutex::new(ModalController::new(mutations.clone()));

        Self {
            inner: Arc::new(ConsoleInner {
                config,
                gateway,
                views,
                sync,
                mutations,
                notifications,
                connectivity,
                modal,
            }),
        }
    }

    /// Probe connectivity and load every domain, concurrently.
    pub async fn start(&self) -> StartReport {
        info!(url = %self.inner.config.api_url, "starting console");
        let (reachability, load) = tokio::join!(
            self.inner.connectivity.probe(),
            self.inner.sync.load_all()
        );
        StartReport { reachability, load }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    // ── Views ────────────────────────────────────────────────────────

    pub fn view(&self, domain: DomainId) -> Arc<DomainView> {
        self.inner.views.snapshot(domain)
    }

    pub fn subscribe(&self, domain: DomainId) -> watch::Receiver<Arc<DomainView>> {
        self.inner.views.subscribe(domain)
    }

    pub fn sync(&self) -> &SyncOrchestrator {
        &self.inner.sync
    }

    /// Re-fetch one domain.
    pub async fn reload(&self, domain: DomainId) -> Result<bool, CoreError> {
        Ok(self.inner.sync.reload(domain).await?)
    }

    // ── Mutations ────────────────────────────────────────────────────

    pub async fn mutate(&self, mutation: Mutation) -> MutationResult {
        self.inner.mutations.mutate(mutation).await
    }

    pub fn request_delete(
        &self,
        domain: DomainId,
        key: impl Into<String>,
    ) -> Result<PendingDelete, CoreError> {
        self.inner.mutations.request_delete(domain, key)
    }

    /// The console's one form controller.
    ///
    /// Every clone of the console shares it, so opening a form here
    /// replaces whatever session any other caller had open.
    pub async fn modal(&self) -> MutexGuard<'_, ModalController> {
        self.inner.modal.lock().await
    }

    // ── Feedback ─────────────────────────────────────────────────────

    pub fn notifications(&self) -> &NotificationChannel {
        &self.inner.notifications
    }

    pub fn connectivity(&self) -> &ConnectivityMonitor {
        &self.inner.connectivity
    }

    // ── Whole-store export ───────────────────────────────────────────

    pub async fn running_config(&self) -> Result<Value, CoreError> {
        Ok(self.inner.gateway.running_config().await?)
    }
}
