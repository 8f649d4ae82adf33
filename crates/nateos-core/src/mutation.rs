// ── Mutation gateway ──
//
// Turns an add/update/delete request into exactly one remote write, picked
// from the domain's shape. A successful write is followed by a reload of
// that one domain; a failed write only produces a notification.

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::CoreError;
use crate::gateway::RemoteGateway;
use crate::model::{
    DomainDescriptor, DomainId, FieldKind, MutationKind, Record, Shape, UpsertRoute, Verb,
    describe,
};
use crate::notify::NotificationChannel;
use crate::sync::SyncOrchestrator;

pub type MutationResult = Result<(), CoreError>;

/// A requested change to one domain.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub domain: DomainId,
    pub kind: MutationKind,
    pub key: Option<String>,
    pub payload: Option<Record>,
}

impl Mutation {
    pub fn upsert(domain: DomainId, key: Option<String>, payload: Record) -> Self {
        Self {
            domain,
            kind: MutationKind::Upsert,
            key,
            payload: Some(payload),
        }
    }

    pub fn append(domain: DomainId, payload: Record) -> Self {
        Self {
            domain,
            kind: MutationKind::Append,
            key: None,
            payload: Some(payload),
        }
    }

    pub fn delete(domain: DomainId, key: impl Into<String>) -> Self {
        Self {
            domain,
            kind: MutationKind::Delete,
            key: Some(key.into()),
            payload: None,
        }
    }
}

/// The single request a mutation resolves to.
#[derive(Debug, Clone, PartialEq)]
pub struct WritePlan {
    pub verb: Verb,
    pub key: Option<String>,
    pub body: Option<Value>,
}

/// Resolve the verb, path key and body for a mutation.
pub fn plan(descriptor: &DomainDescriptor, mutation: &Mutation) -> Result<WritePlan, CoreError> {
    let unsupported = || CoreError::UnsupportedMutation {
        domain: descriptor.id,
        kind: mutation.kind,
    };
    let body = || {
        mutation
            .payload
            .clone()
            .unwrap_or_default()
            .into_value()
    };

    let write = match mutation.kind {
        MutationKind::Upsert => match descriptor.upsert.ok_or_else(unsupported)? {
            UpsertRoute::Resource => WritePlan {
                verb: Verb::Put,
                key: None,
                body: Some(body()),
            },
            UpsertRoute::Member => WritePlan {
                verb: Verb::Put,
                key: Some(require_key(descriptor, mutation)?.to_owned()),
                body: Some(body()),
            },
            UpsertRoute::Create => WritePlan {
                verb: Verb::Post,
                key: None,
                body: Some(create_body(descriptor, mutation)?),
            },
        },
        MutationKind::Append => {
            if descriptor.shape != Shape::OrderedList {
                return Err(unsupported());
            }
            WritePlan {
                verb: Verb::Post,
                key: None,
                body: Some(body()),
            }
        }
        MutationKind::Delete => {
            let key = require_key(descriptor, mutation)?;
            match descriptor.shape {
                Shape::MapByKey => {}
                Shape::OrderedList => {
                    if key.parse::<usize>().is_err() {
                        return Err(CoreError::InvalidIndex {
                            domain: descriptor.id,
                            key: key.to_owned(),
                        });
                    }
                }
                Shape::Singleton => return Err(unsupported()),
            }
            WritePlan {
                verb: Verb::Delete,
                key: Some(key.to_owned()),
                body: None,
            }
        }
    };

    if !descriptor.accepts(write.verb) {
        return Err(unsupported());
    }
    Ok(write)
}

fn require_key<'a>(
    descriptor: &DomainDescriptor,
    mutation: &'a Mutation,
) -> Result<&'a str, CoreError> {
    mutation
        .key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or(CoreError::MissingKey {
            domain: descriptor.id,
            kind: mutation.kind,
        })
}

/// Body for a create-by-POST. A key given alongside the payload fills the
/// key field if the payload lacks it.
fn create_body(descriptor: &DomainDescriptor, mutation: &Mutation) -> Result<Value, CoreError> {
    let mut payload = mutation.payload.clone().unwrap_or_default();
    if let (Some(spec), Some(key)) = (descriptor.key.filter(|k| k.in_payload), &mutation.key) {
        if payload.get(spec.name).is_none_or(Value::is_null) {
            let value = match spec.kind {
                FieldKind::Number => key.trim().parse::<i64>().map(Value::from).map_err(|_| {
                    CoreError::Coercion {
                        field: spec.name.into(),
                        message: format!("expected a whole number, got {key:?}"),
                    }
                })?,
                _ => Value::from(key.trim()),
            };
            payload.insert(spec.name, value);
        }
    }
    Ok(payload.into_value())
}

/// User-facing outcome text.
pub fn outcome_message(domain: DomainId, kind: MutationKind, ok: bool) -> String {
    let (done, failed) = match (domain, kind) {
        (DomainId::Interfaces, _) => ("Interface configured", "Failed to configure interface"),
        (DomainId::Vlans, MutationKind::Delete) => ("VLAN deleted", "Failed to delete VLAN"),
        (DomainId::Vlans, _) => ("VLAN created", "Failed to create VLAN"),
        (DomainId::StaticRoutes, MutationKind::Delete) => {
            ("Route deleted", "Failed to delete route")
        }
        (DomainId::StaticRoutes, _) => ("Static route added", "Failed to add route"),
        (DomainId::Stp, _) => ("STP configuration updated", "Failed to update STP"),
        (DomainId::Lldp, _) => ("LLDP configuration updated", "Failed to update LLDP"),
        (DomainId::IgmpSnooping, _) => (
            "IGMP snooping configuration updated",
            "Failed to update IGMP snooping",
        ),
        (DomainId::Ospf, _) => ("OSPF configuration updated", "Failed to update OSPF"),
        (DomainId::Bgp, _) => ("BGP configuration updated", "Failed to update BGP"),
        (DomainId::System, _) => (
            "System configuration updated",
            "Failed to update system config",
        ),
        (DomainId::Aaa, _) => ("AAA configuration updated", "Failed to update AAA"),
    };
    let text = if ok { done } else { failed };
    text.to_owned()
}

fn delete_prompt(domain: DomainId, key: &str) -> String {
    match domain {
        DomainId::Vlans => format!("Delete VLAN {key}?"),
        DomainId::StaticRoutes => format!("Delete static route #{key}?"),
        other => format!("Delete {key} from {}?", describe(other).title),
    }
}

// ── Gateway ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MutationGateway {
    gateway: RemoteGateway,
    sync: SyncOrchestrator,
    notifications: NotificationChannel,
}

impl MutationGateway {
    pub fn new(
        gateway: RemoteGateway,
        sync: SyncOrchestrator,
        notifications: NotificationChannel,
    ) -> Self {
        Self {
            gateway,
            sync,
            notifications,
        }
    }

    pub(crate) fn notifications(&self) -> &NotificationChannel {
        &self.notifications
    }

    /// Apply an upsert or append. Deletes must go through
    /// [`request_delete`](Self::request_delete).
    pub async fn mutate(&self, mutation: Mutation) -> MutationResult {
        if mutation.kind == MutationKind::Delete {
            return Err(CoreError::ConfirmationRequired {
                domain: mutation.domain,
            });
        }
        self.execute(mutation).await
    }

    /// Stage a delete behind a confirmation step.
    pub fn request_delete(
        &self,
        domain: DomainId,
        key: impl Into<String>,
    ) -> Result<PendingDelete, CoreError> {
        let mutation = Mutation::delete(domain, key);
        plan(describe(domain), &mutation)?;

        let key = mutation.key.as_deref().unwrap_or_default();
        Ok(PendingDelete {
            prompt: delete_prompt(domain, key.trim()),
            gateway: self.clone(),
            mutation,
        })
    }

    async fn execute(&self, mutation: Mutation) -> MutationResult {
        let domain = mutation.domain;
        let kind = mutation.kind;
        let descriptor = describe(domain);

        let write = match plan(descriptor, &mutation) {
            Ok(write) => write,
            Err(e) => {
                warn!(%domain, %kind, error = %e, "rejected mutation");
                self.notifications.failure(outcome_message(domain, kind, false));
                return Err(e);
            }
        };

        match self
            .gateway
            .write(descriptor, write.key.as_deref(), write.body.as_ref(), write.verb)
            .await
        {
            Ok(()) => {
                info!(%domain, %kind, key = write.key.as_deref(), "mutation applied");
                self.notifications.success(outcome_message(domain, kind, true));
                // A failed reload is logged by the orchestrator and keeps the
                // pre-mutation view.
                let _ = self.sync.reload(domain).await;
                Ok(())
            }
            Err(failure) => {
                warn!(%domain, %kind, error = %failure, "mutation failed");
                self.notifications.failure(outcome_message(domain, kind, false));
                Err(failure.into())
            }
        }
    }
}

/// A delete staged for confirmation. Dropping it issues no request.
#[must_use = "a pending delete does nothing unless confirmed"]
pub struct PendingDelete {
    gateway: MutationGateway,
    mutation: Mutation,
    prompt: String,
}

impl PendingDelete {
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn domain(&self) -> DomainId {
        self.mutation.domain
    }

    pub fn key(&self) -> &str {
        self.mutation.key.as_deref().unwrap_or_default()
    }

    /// Issue the delete and wait for it to settle.
    pub async fn confirm(self) -> MutationResult {
        self.gateway.execute(self.mutation).await
    }

    /// Issue the delete in the background.
    pub fn dispatch(self) -> JoinHandle<MutationResult> {
        tokio::spawn(self.confirm())
    }

    #[allow(clippy::needless_pass_by_value)]
    pub fn cancel(self) {}
}
