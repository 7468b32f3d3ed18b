//! Snapshot feeds
//!
//! A `SnapshotHub` fans full-collection snapshots out to any number of
//! `Subscription`s. Each snapshot replaces the whole collection it names, so
//! subscribers never merge: the last snapshot received wins.
//!
//! Subscriptions are detached from their hub by `unsubscribe()` or on drop.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use log::trace;

use crate::models::Snapshot;

#[derive(Default)]
struct HubInner {
    next_id: u64,
    subscribers: Vec<(u64, Sender<Snapshot>)>,
}

/// Publisher side of a snapshot feed
#[derive(Clone, Default)]
pub struct SnapshotHub {
    inner: Arc<Mutex<HubInner>>,
}

fn lock(inner: &Mutex<HubInner>) -> MutexGuard<'_, HubInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SnapshotHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber and deliver `initial` to it alone
    pub fn subscribe(&self, initial: Vec<Snapshot>) -> Subscription {
        let (tx, rx) = mpsc::channel();
        for snapshot in initial {
            // The receiver is held below, so this cannot fail
            let _ = tx.send(snapshot);
        }

        let mut inner = lock(&self.inner);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((id, tx));
        trace!("feed subscriber {} attached", id);

        Subscription {
            id,
            rx,
            hub: Arc::downgrade(&self.inner),
            attached: true,
        }
    }

    /// Send a snapshot to every live subscriber
    pub fn publish(&self, snapshot: Snapshot) {
        let mut inner = lock(&self.inner);
        inner
            .subscribers
            .retain(|(_, tx)| tx.send(snapshot.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner).subscribers.len()
    }
}

/// Receiving side of a snapshot feed
pub struct Subscription {
    id: u64,
    rx: Receiver<Snapshot>,
    hub: Weak<Mutex<HubInner>>,
    attached: bool,
}

impl Subscription {
    /// All snapshots pending right now, oldest first
    pub fn drain(&self) -> Vec<Snapshot> {
        self.rx.try_iter().collect()
    }

    /// Detach from the hub; no further snapshots will arrive
    pub fn unsubscribe(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        if let Some(inner) = self.hub.upgrade() {
            lock(&inner).subscribers.retain(|(id, _)| *id != self.id);
            trace!("feed subscriber {} detached", self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Income, RecordKind};

    fn incomes(n: usize) -> Snapshot {
        Snapshot::Incomes((0..n).map(|_| Income::new("2024-01-01", "Job", 1.0)).collect())
    }

    #[test]
    fn test_initial_snapshots_delivered_on_subscribe() {
        let hub = SnapshotHub::new();
        let sub = hub.subscribe(vec![incomes(2), Snapshot::Expenses(vec![])]);

        let pending = sub.drain();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].kind(), RecordKind::Income);
        assert_eq!(pending[0].len(), 2);
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn test_publish_reaches_all_subscribers() {
        let hub = SnapshotHub::new();
        let a = hub.subscribe(vec![]);
        let b = hub.subscribe(vec![]);

        hub.publish(incomes(1));
        assert_eq!(a.drain().len(), 1);
        assert_eq!(b.drain().len(), 1);
    }

    #[test]
    fn test_unsubscribe_is_explicit_and_on_drop() {
        let hub = SnapshotHub::new();
        let a = hub.subscribe(vec![]);
        let b = hub.subscribe(vec![]);
        assert_eq!(hub.subscriber_count(), 2);

        a.unsubscribe();
        assert_eq!(hub.subscriber_count(), 1);

        drop(b);
        assert_eq!(hub.subscriber_count(), 0);

        // Publishing with no subscribers is a no-op
        hub.publish(incomes(1));
    }

    #[test]
    fn test_subscription_outlives_hub() {
        let hub = SnapshotHub::new();
        let sub = hub.subscribe(vec![incomes(1)]);
        drop(hub);
        assert_eq!(sub.drain().len(), 1);
        sub.unsubscribe();
    }
}
