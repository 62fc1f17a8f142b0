//! Push transport abstraction and the in-process implementation
//!
//! The realtime channel is modelled as named rooms carrying JSON
//! envelopes. [`LocalPushTransport`] backs tests and single-process
//! deployments; a network-backed implementation plugs in behind the same
//! trait without touching the client.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

/// Envelopes buffered per room before old ones are dropped
const ROOM_CAPACITY: usize = 100;

/// One pushed message: an event name plus its JSON payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushEnvelope {
    /// Wire event name, for example `observation:created`
    pub event: String,
    /// Entity payload as sent by the server
    pub data: Value,
}

impl PushEnvelope {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }
}

/// Room-scoped publish/subscribe channel
///
/// Join hands back a live receiver; dropping the receiver ends the
/// subscription. `leave` lets the transport release room state once the
/// last receiver is gone, so callers drop their receiver before leaving.
pub trait PushTransport: Send + Sync {
    /// Join a room, receiving every envelope published after this call
    fn join(&self, room: &str) -> broadcast::Receiver<PushEnvelope>;

    /// Leave a room, releasing its state if nobody is still subscribed
    fn leave(&self, room: &str);

    /// Publish an envelope to everyone currently in the room
    fn publish(&self, room: &str, envelope: PushEnvelope);
}

/// In-process transport: one broadcast channel per room
#[derive(Clone, Default)]
pub struct LocalPushTransport {
    rooms: Arc<Mutex<HashMap<String, broadcast::Sender<PushEnvelope>>>>,
}

impl LocalPushTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rooms currently held open
    pub fn room_count(&self) -> usize {
        self.rooms
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Live subscribers in a room (0 when the room does not exist)
    pub fn receivers_in(&self, room: &str) -> usize {
        self.rooms
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(room)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }
}

impl PushTransport for LocalPushTransport {
    fn join(&self, room: &str) -> broadcast::Receiver<PushEnvelope> {
        let mut rooms = self.rooms.lock().unwrap_or_else(PoisonError::into_inner);
        rooms
            .entry(room.to_string())
            .or_insert_with(|| broadcast::channel(ROOM_CAPACITY).0)
            .subscribe()
    }

    fn leave(&self, room: &str) {
        let mut rooms = self.rooms.lock().unwrap_or_else(PoisonError::into_inner);
        let empty = rooms
            .get(room)
            .map(|tx| tx.receiver_count() == 0)
            .unwrap_or(false);
        if empty {
            rooms.remove(room);
        }
    }

    fn publish(&self, room: &str, envelope: PushEnvelope) {
        let rooms = self.rooms.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(tx) = rooms.get(room) {
            let _ = tx.send(envelope);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_then_publish_delivers() {
        let transport = LocalPushTransport::new();
        let mut rx = transport.join("u-1");

        transport.publish("u-1", PushEnvelope::new("goal:created", json!({"id": "g-1"})));

        let envelope = rx.try_recv().expect("Should receive envelope");
        assert_eq!(envelope.event, "goal:created");
        assert_eq!(envelope.data["id"], "g-1");
    }

    #[test]
    fn test_publish_to_unjoined_room_is_silent() {
        let transport = LocalPushTransport::new();
        transport.publish("nobody", PushEnvelope::new("goal:created", json!({})));
        assert_eq!(transport.room_count(), 0);
    }

    #[test]
    fn test_rooms_are_isolated() {
        let transport = LocalPushTransport::new();
        let mut rx_a = transport.join("a");
        let mut rx_b = transport.join("b");

        transport.publish("a", PushEnvelope::new("goal:created", json!({})));

        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn test_leave_releases_room_after_last_receiver_drops() {
        let transport = LocalPushTransport::new();
        let rx = transport.join("u-1");
        assert_eq!(transport.room_count(), 1);

        // still subscribed: leave keeps the room
        transport.leave("u-1");
        assert_eq!(transport.room_count(), 1);

        drop(rx);
        transport.leave("u-1");
        assert_eq!(transport.room_count(), 0);
    }

    #[test]
    fn test_multiple_receivers_share_a_room() {
        let transport = LocalPushTransport::new();
        let mut rx1 = transport.join("u-1");
        let mut rx2 = transport.join("u-1");
        assert_eq!(transport.receivers_in("u-1"), 2);

        transport.publish("u-1", PushEnvelope::new("observation:created", json!({})));

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }
}
