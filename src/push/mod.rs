//! Real-time push client
//!
//! Joins the viewer's room on a [`PushTransport`], applies pushed entities
//! to the local context, and re-emits them as typed events on the
//! context's bus. Rooms are scoped per user (user id, display name when no
//! id exists), but room scoping is advisory: the ownership check on
//! observation payloads is what guarantees a foreign record never lands in
//! this viewer's state.
//!
//! The client degrades, never fails: a closed channel emits
//! [`DomainEvent::SyncDegraded`] and the dashboard keeps working from
//! local state.

pub mod transport;

pub use transport::*;

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::events::DomainEvent;
use crate::model::{Goal, Observation, Viewer};
use crate::sync::DashboardContext;

/// Live subscription applying pushed entities to one context
///
/// Created with [`PushClient::spawn`]; torn down with
/// [`PushClient::shutdown`], which cancels the loop, drops the room
/// subscription, and leaves the room, in that order.
pub struct PushClient {
    room: String,
    transport: Arc<dyn PushTransport>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PushClient {
    /// Join the viewer's room and start applying pushed entities
    pub fn spawn(
        transport: Arc<dyn PushTransport>,
        viewer: Viewer,
        context: DashboardContext,
    ) -> Self {
        let room = viewer.room_key().to_string();
        let rx = transport.join(&room);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_client(rx, viewer, context, cancel.clone()));
        info!("Push client joined room '{}'", room);
        Self {
            room,
            transport,
            cancel,
            task,
        }
    }

    /// The room this client subscribed to
    pub fn room(&self) -> &str {
        &self.room
    }

    /// Stop the client deterministically.
    ///
    /// After this returns, no further pushed entity can reach the context
    /// and the transport has been told to release the room.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        // the task owns the receiver; awaiting it guarantees the
        // subscription is dropped before the room is released
        let _ = self.task.await;
        self.transport.leave(&self.room);
        info!("Push client left room '{}'", self.room);
    }
}

async fn run_client(
    mut rx: broadcast::Receiver<PushEnvelope>,
    viewer: Viewer,
    context: DashboardContext,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,

            received = rx.recv() => match received {
                Ok(envelope) => handle_envelope(envelope, &viewer, &context).await,
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!("Push client in room '{}' missed {} envelopes", viewer.room_key(), missed);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    context.events().emit_lossy(DomainEvent::SyncDegraded {
                        reason: "push channel closed".to_string(),
                        timestamp: Utc::now(),
                    });
                    break;
                }
            },
        }
    }
}

async fn handle_envelope(envelope: PushEnvelope, viewer: &Viewer, context: &DashboardContext) {
    match envelope.event.as_str() {
        "observation:created" | "observation:updated" => {
            let observation: Observation = match serde_json::from_value(envelope.data) {
                Ok(observation) => observation,
                Err(e) => {
                    warn!("Discarding malformed '{}' payload: {}", envelope.event, e);
                    return;
                }
            };
            if !observation.owner_ref().matches(&viewer.owner_ref()) {
                debug!(
                    "Dropping pushed observation {} not owned by viewer",
                    observation.id
                );
                return;
            }

            let created = envelope.event == "observation:created";
            match context.upsert_observation(observation.clone()).await {
                Ok(true) => {
                    let event = if created {
                        DomainEvent::ObservationCreated {
                            observation,
                            timestamp: Utc::now(),
                        }
                    } else {
                        DomainEvent::ObservationUpdated {
                            observation,
                            timestamp: Utc::now(),
                        }
                    };
                    context.events().emit_lossy(event);
                }
                Ok(false) => {} // echo of a record we already hold
                Err(e) => warn!("Failed to apply pushed observation: {}", e),
            }
        }

        "goal:created" | "goal:updated" => {
            let goal: Goal = match serde_json::from_value(envelope.data) {
                Ok(goal) => goal,
                Err(e) => {
                    warn!("Discarding malformed '{}' payload: {}", envelope.event, e);
                    return;
                }
            };

            let created = envelope.event == "goal:created";
            match context.upsert_goal(goal.clone()).await {
                Ok(true) => {
                    let event = if created {
                        DomainEvent::GoalCreated {
                            goal,
                            timestamp: Utc::now(),
                        }
                    } else {
                        DomainEvent::GoalUpdated {
                            goal,
                            timestamp: Utc::now(),
                        }
                    };
                    context.events().emit_lossy(event);
                }
                Ok(false) => {}
                Err(e) => warn!("Failed to apply pushed goal: {}", e),
            }
        }

        other => debug!("Ignoring unrecognized push event '{}'", other),
    }
}
