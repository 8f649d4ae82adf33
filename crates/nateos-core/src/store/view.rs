// ── Per-domain view state ──
//
// Each domain owns one `watch` channel carrying an immutable snapshot.
// Loads take a ticket before they are issued; a completed load only lands
// if its ticket is newer than the one already applied.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::model::{DomainId, DomainState, describe};

/// Snapshot of one domain as last fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainView {
    pub domain: DomainId,
    /// Ticket of the load that produced this state (0 = never loaded).
    pub seq: u64,
    pub state: Option<DomainState>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl DomainView {
    fn unloaded(domain: DomainId) -> Self {
        Self {
            domain,
            seq: 0,
            state: None,
            fetched_at: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.state.is_some()
    }

    /// The loaded state, or the descriptor's empty/default state.
    pub fn state_or_default(&self) -> DomainState {
        self.state
            .clone()
            .unwrap_or_else(|| DomainState::empty(describe(self.domain)))
    }
}

/// Ticket issued to a load before it goes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket {
    pub(crate) domain: DomainId,
    pub(crate) seq: u64,
}

struct ViewSlot {
    issued: AtomicU64,
    view: watch::Sender<Arc<DomainView>>,
}

impl ViewSlot {
    fn new(domain: DomainId) -> Self {
        let (view, _) = watch::channel(Arc::new(DomainView::unloaded(domain)));
        Self {
            issued: AtomicU64::new(0),
            view,
        }
    }
}

/// Owner of every domain's view.
pub struct ViewStore {
    slots: Vec<(DomainId, ViewSlot)>,
}

impl ViewStore {
    pub fn new() -> Self {
        Self {
            slots: DomainId::all().map(|id| (id, ViewSlot::new(id))).collect(),
        }
    }

    fn slot(&self, domain: DomainId) -> &ViewSlot {
        self.slots
            .iter()
            .find_map(|(id, slot)| (*id == domain).then_some(slot))
            .expect("every catalog domain has a view slot")
    }

    /// Reserve the next ticket for a load of `domain`.
    pub fn begin(&self, domain: DomainId) -> LoadTicket {
        let seq = self.slot(domain).issued.fetch_add(1, Ordering::Relaxed) + 1;
        LoadTicket { domain, seq }
    }

    /// Publish a completed load. Returns `false` if a newer load already
    /// landed, in which case the state is dropped.
    pub fn apply(&self, ticket: LoadTicket, state: DomainState) -> bool {
        self.slot(ticket.domain).view.send_if_modified(|current| {
            if ticket.seq <= current.seq {
                return false;
            }
            *current = Arc::new(DomainView {
                domain: ticket.domain,
                seq: ticket.seq,
                state: Some(state),
                fetched_at: Some(Utc::now()),
            });
            true
        })
    }

    /// Current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self, domain: DomainId) -> Arc<DomainView> {
        self.slot(domain).view.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self, domain: DomainId) -> watch::Receiver<Arc<DomainView>> {
        self.slot(domain).view.subscribe()
    }
}

impl Default for ViewStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::model::Record;

    fn vlans(names: &[(&str, &str)]) -> DomainState {
        DomainState::Keyed(
            names
                .iter()
                .map(|(id, name)| {
                    let record: Record = [("name", serde_json::Value::from(*name))]
                        .into_iter()
                        .collect();
                    ((*id).to_owned(), record)
                })
                .collect::<BTreeMap<_, _>>(),
        )
    }

    #[test]
    fn views_start_unloaded() {
        let store = ViewStore::new();
        for id in DomainId::all() {
            let view = store.snapshot(id);
            assert_eq!(view.domain, id);
            assert!(!view.is_loaded());
        }
    }

    #[test]
    fn newer_ticket_replaces_state() {
        let store = ViewStore::new();
        let ticket = store.begin(DomainId::Vlans);
        assert!(store.apply(ticket, vlans(&[("100", "Eng")])));

        let view = store.snapshot(DomainId::Vlans);
        assert_eq!(view.seq, 1);
        assert_eq!(view.state, Some(vlans(&[("100", "Eng")])));
        assert!(view.fetched_at.is_some());
    }

    #[test]
    fn stale_response_is_discarded() {
        let store = ViewStore::new();
        let older = store.begin(DomainId::Vlans);
        let newer = store.begin(DomainId::Vlans);

        assert!(store.apply(newer, vlans(&[("100", "Eng")])));
        assert!(!store.apply(older, DomainState::Keyed(BTreeMap::new())));

        assert_eq!(store.snapshot(DomainId::Vlans).state, Some(vlans(&[("100", "Eng")])));
    }

    #[test]
    fn domains_are_independent() {
        let store = ViewStore::new();
        let _ = store.begin(DomainId::Vlans);
        let ticket = store.begin(DomainId::Interfaces);
        assert_eq!(ticket.seq, 1);
        assert!(store.apply(ticket, DomainState::Keyed(BTreeMap::new())));
        assert!(!store.snapshot(DomainId::Vlans).is_loaded());
    }

    #[tokio::test]
    async fn subscribers_see_applied_loads() {
        let store = ViewStore::new();
        let mut rx = store.subscribe(DomainId::Stp);

        let ticket = store.begin(DomainId::Stp);
        store.apply(ticket, DomainState::empty(describe(DomainId::Stp)));

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().seq, 1);
    }
}
