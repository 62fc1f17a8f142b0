//! Cross-context change propagation
//!
//! When one dashboard context saves a collection, every other context in
//! the process must converge on the same snapshot. The [`ChangeBus`] is
//! the hub carrying whole-collection notifications tagged with the
//! writer's context id; each context's listener skips notifications whose
//! origin is itself, which is what makes delivery cross-context only.
//! Same-context consumers are signalled through the context's own
//! [`EventBus`](crate::events::EventBus) instead.

pub mod context;

pub use context::*;

use tokio::sync::broadcast;
use uuid::Uuid;

/// One collection snapshot in flight between contexts
#[derive(Debug, Clone)]
pub struct CollectionChange {
    /// Stable collection key (see [`crate::store`])
    pub key: String,
    /// Whole-collection JSON document, exactly as persisted
    pub snapshot: String,
    /// Context that performed the write
    pub origin: Uuid,
}

/// Hub distributing collection changes to every context in the process
///
/// Uses tokio::broadcast internally, so slow contexts never block a
/// writer and a lagging listener is told how much it missed.
#[derive(Clone)]
pub struct ChangeBus {
    tx: broadcast::Sender<CollectionChange>,
    capacity: usize,
}

impl ChangeBus {
    /// Creates a new ChangeBus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<CollectionChange> {
        self.tx.subscribe()
    }

    /// Announce that `key` now holds `snapshot`.
    ///
    /// Lossy on purpose: a process with a single dashboard context has no
    /// listeners, and that is the normal standalone case.
    pub fn notify(&self, key: &str, snapshot: String, origin: Uuid) {
        let _ = self.tx.send(CollectionChange {
            key: key.to_string(),
            snapshot,
            origin,
        });
    }

    /// Get the current number of listening contexts
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
