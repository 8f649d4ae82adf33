// ── Notification channel ──
//
// Shared newest-first feed of transient outcome messages. Each entry
// schedules its own removal; readers additionally filter by deadline so an
// entry is never visible past its TTL even if the removal task has not run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Failure,
}

impl NotificationKind {
    pub fn ttl(self) -> Duration {
        match self {
            Self::Success => Duration::from_secs(3),
            Self::Failure => Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryHandle(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub handle: EntryHandle,
    pub message: String,
    pub kind: NotificationKind,
    pub expires_at: Instant,
}

impl Notification {
    pub fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

type Feed = Arc<Vec<Notification>>;

struct Inner {
    feed: watch::Sender<Feed>,
    next: AtomicU64,
}

impl Inner {
    fn remove(&self, handle: EntryHandle) -> bool {
        self.feed.send_if_modified(|feed| {
            if !feed.iter().any(|n| n.handle == handle) {
                return false;
            }
            *feed = Arc::new(feed.iter().filter(|n| n.handle != handle).cloned().collect());
            true
        })
    }
}

#[derive(Clone)]
pub struct NotificationChannel {
    inner: Arc<Inner>,
}

impl NotificationChannel {
    pub fn new() -> Self {
        let (feed, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            inner: Arc::new(Inner {
                feed,
                next: AtomicU64::new(0),
            }),
        }
    }

    /// Push an entry to the front of the feed and schedule its expiry.
    pub fn post(&self, message: impl Into<String>, kind: NotificationKind) -> EntryHandle {
        let handle = EntryHandle(self.inner.next.fetch_add(1, Ordering::Relaxed) + 1);
        let now = Instant::now();
        let entry = Notification {
            handle,
            message: message.into(),
            kind,
            expires_at: now + kind.ttl(),
        };
        let expires_at = entry.expires_at;

        self.inner.feed.send_modify(|feed| {
            let mut next = Vec::with_capacity(feed.len() + 1);
            next.push(entry);
            next.extend(feed.iter().filter(|n| n.is_live(now)).cloned());
            *feed = Arc::new(next);
        });

        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            let inner: Weak<Inner> = Arc::downgrade(&self.inner);
            runtime.spawn(async move {
                tokio::time::sleep_until(expires_at).await;
                if let Some(inner) = inner.upgrade() {
                    inner.remove(handle);
                }
            });
        }

        handle
    }

    pub fn success(&self, message: impl Into<String>) -> EntryHandle {
        self.post(message, NotificationKind::Success)
    }

    pub fn failure(&self, message: impl Into<String>) -> EntryHandle {
        self.post(message, NotificationKind::Failure)
    }

    /// Remove an entry before its TTL. Returns `false` if it was already gone.
    pub fn dismiss(&self, handle: EntryHandle) -> bool {
        self.inner.remove(handle)
    }

    /// Live entries, newest first.
    pub fn entries(&self) -> Vec<Notification> {
        let now = Instant::now();
        self.inner
            .feed
            .borrow()
            .iter()
            .filter(|n| n.is_live(now))
            .cloned()
            .collect()
    }

    /// Raw feed updates. Receivers should still filter with
    /// [`Notification::is_live`].
    pub fn subscribe(&self) -> watch::Receiver<Feed> {
        self.inner.feed.subscribe()
    }
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new()
    }
}
