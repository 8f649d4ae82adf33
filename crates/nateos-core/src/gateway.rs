// ── Remote gateway ──
//
// Typed reads and writes against a domain's resource path. Every expected
// failure (network, status, decode) comes back as a `RemoteFailure`; nothing
// here touches view state.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;
use tracing::debug;

use nateos_api::ApiClient;

use crate::connectivity::Reachability;
use crate::error::RemoteFailure;
use crate::model::{DomainDescriptor, DomainState, Verb};

#[derive(Clone)]
pub struct RemoteGateway {
    client: ApiClient,
    reachability: Option<Arc<watch::Sender<Reachability>>>,
}

impl RemoteGateway {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            reachability: None,
        }
    }

    /// Report network failures to the connectivity flag.
    pub(crate) fn with_reachability(mut self, flag: Arc<watch::Sender<Reachability>>) -> Self {
        self.reachability = Some(flag);
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// `GET {resource_path}` decoded per the descriptor's shape.
    pub async fn load(&self, descriptor: &DomainDescriptor) -> Result<DomainState, RemoteFailure> {
        debug!(domain = %descriptor.id, "loading domain");
        let result = match self.client.get_json(descriptor.resource_path).await {
            Ok(document) => DomainState::decode(descriptor, document),
            Err(e) => Err(e.into()),
        };
        self.observe(result)
    }

    /// Issue one write. `key` addresses a member (`{path}/{key}`).
    pub async fn write(
        &self,
        descriptor: &DomainDescriptor,
        key: Option<&str>,
        payload: Option<&Value>,
        verb: Verb,
    ) -> Result<(), RemoteFailure> {
        debug!(domain = %descriptor.id, %verb, key, "writing domain");
        let result = self
            .client
            .send(verb.method(), descriptor.resource_path, key, payload)
            .await
            .map_err(RemoteFailure::from);
        self.observe(result)
    }

    /// Whole running configuration, as the remote returns it.
    pub async fn running_config(&self) -> Result<Value, RemoteFailure> {
        let result = self.client.running_config().await.map_err(RemoteFailure::from);
        self.observe(result)
    }

    fn observe<T>(&self, result: Result<T, RemoteFailure>) -> Result<T, RemoteFailure> {
        if let (Err(failure), Some(flag)) = (&result, &self.reachability) {
            if failure.is_network() {
                flag.send_replace(Reachability::Unreachable);
            }
        }
        result
    }
}
