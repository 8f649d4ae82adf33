//! Configuration sync and mutation orchestration for the NateOS console.
//!
//! - **[`Console`]**: facade owning one session against a device's
//!   configuration API. [`start()`](Console::start) probes liveness and
//!   loads every domain concurrently.
//!
//! - **Domain model** ([`model`]): the fixed catalog of configuration
//!   domains (interfaces, VLANs, STP, ..., AAA), each with a resource path,
//!   a shape (keyed map, ordered list or singleton) and field coercion rules.
//!
//! - **[`RemoteGateway`]** and **[`SyncOrchestrator`]**: typed loads into
//!   versioned per-domain views ([`DomainView`]) published through `watch`
//!   channels. Stale responses are discarded by sequence ticket.
//!
//! - **[`MutationGateway`]**: one write per user action, a reload of the
//!   affected domain on success, and a notification either way. Deletes are
//!   staged as a [`PendingDelete`] until confirmed.
//!
//! - **[`ModalController`]**: single-slot form state machine that submits
//!   fire-and-forget.
//!
//! - **[`NotificationChannel`]** and **[`ConnectivityMonitor`]**: transient
//!   feedback and the reachable/unreachable flag.

pub mod config;
pub mod connectivity;
pub mod console;
pub mod error;
pub mod gateway;
pub mod modal;
pub mod model;
pub mod mutation;
pub mod notify;
pub mod store;
pub mod sync;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ConsoleConfig, TlsVerification, default_api_url};
pub use connectivity::{ConnectivityMonitor, Reachability};
pub use console::{Console, StartReport};
pub use error::{CoreError, FailureCause, RemoteFailure};
pub use gateway::RemoteGateway;
pub use modal::{FieldRole, FormField, FormSpec, ModalController, ModalSession};
pub use model::{
    DomainDescriptor, DomainId, DomainState, FieldKind, FieldSpec, Layer, MutationKind, Record,
    Shape, Verb, catalog, describe, describe_str,
};
pub use mutation::{Mutation, MutationGateway, MutationResult, PendingDelete, WritePlan, plan};
pub use notify::{EntryHandle, Notification, NotificationChannel, NotificationKind};
pub use store::{DomainView, ViewStore};
pub use sync::{LoadReport, SyncOrchestrator};
