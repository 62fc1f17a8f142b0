//! Event types for the engine's notification system
//!
//! Provides the shared event definitions and the EventBus each dashboard
//! context carries.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::model::{Goal, Observation};

/// Engine event types
///
/// Events are broadcast on a per-context EventBus and can be serialized for
/// transmission. The four entity events use the exact names the real-time
/// push channel uses on the wire, so `event_type()` doubles as the push
/// event-name mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DomainEvent {
    /// A new observation entered local state (wizard submit or push)
    #[serde(rename = "observation:created")]
    ObservationCreated {
        /// Full entity, not a diff
        observation: Observation,
        /// When the event was observed locally
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// An existing observation was replaced (reflection, remote edit)
    #[serde(rename = "observation:updated")]
    ObservationUpdated {
        /// Full entity, not a diff
        observation: Observation,
        /// When the event was observed locally
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A new goal entered local state
    #[serde(rename = "goal:created")]
    GoalCreated {
        goal: Goal,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// An existing goal was replaced (progress update)
    #[serde(rename = "goal:updated")]
    GoalUpdated {
        goal: Goal,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A persisted collection changed and in-memory state was refreshed
    ///
    /// Emitted in the writing context after every save (the cross-context
    /// notification is never delivered back to the writer), and in receiving
    /// contexts after a propagated snapshot actually replaced local state.
    /// Consumers re-read through the context; the event carries no payload
    /// beyond the collection key.
    #[serde(rename = "collection:refreshed")]
    CollectionRefreshed {
        /// Stable collection key (see [`crate::store`])
        key: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Real-time channel or backend API became unavailable
    ///
    /// Non-fatal: local state remains the source of truth and the dashboard
    /// keeps working without live updates.
    #[serde(rename = "sync:degraded")]
    SyncDegraded {
        reason: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl DomainEvent {
    /// Get event type as string for filtering; matches the wire names used
    /// by the push channel for the four entity events.
    pub fn event_type(&self) -> &str {
        match self {
            DomainEvent::ObservationCreated { .. } => "observation:created",
            DomainEvent::ObservationUpdated { .. } => "observation:updated",
            DomainEvent::GoalCreated { .. } => "goal:created",
            DomainEvent::GoalUpdated { .. } => "goal:updated",
            DomainEvent::CollectionRefreshed { .. } => "collection:refreshed",
            DomainEvent::SyncDegraded { .. } => "sync:degraded",
        }
    }
}

/// Central event distribution bus, one per dashboard context
///
/// Uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
/// - Lagged message detection for slow subscribers
///
/// # Capacity Recommendations
///
/// - Interactive dashboards: 1000
/// - Testing: 10-100
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DomainEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of events to buffer before dropping old events
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Returns a receiver that will receive all events emitted after
    /// subscription. Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: DomainEvent,
    ) -> Result<usize, broadcast::error::SendError<DomainEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// Useful for signals where it's acceptable if no component is currently
    /// listening (a context with no mounted views, for example).
    pub fn emit_lossy(&self, event: DomainEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
