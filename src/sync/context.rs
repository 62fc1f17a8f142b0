//! Dashboard context: in-memory collections with write-through persistence
//!
//! A context is one dashboard surface (a window, an embedded panel, a test
//! harness). All mutations follow the same path: change the in-memory
//! collection, persist the whole collection, hand the snapshot to the
//! [`ChangeBus`] for other contexts, and signal this context's own
//! consumers on its [`EventBus`]. Concurrent writers settle last-write-wins
//! at whole-collection granularity; there is no merge.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::events::{DomainEvent, EventBus};
use crate::model::{
    DetailedReflection, EvidenceSubmission, Goal, Observation, Registrant, Role, TrainingEvent,
    Viewer,
};
use crate::store::{
    CollectionStore, GOALS_KEY, MOOC_SUBMISSIONS_KEY, OBSERVATIONS_KEY, TRAINING_EVENTS_KEY,
};
use crate::sync::ChangeBus;
use crate::{Error, Result};

/// Event bus capacity for an interactive dashboard
const EVENT_CAPACITY: usize = 1000;

/// One dashboard surface's view of the shared collections
///
/// Cloning is cheap and clones share state and identity: a clone is the
/// same context, not a new one. Create a second `DashboardContext` (same
/// store, same hub) to model a second surface.
#[derive(Clone)]
pub struct DashboardContext {
    id: Uuid,
    store: CollectionStore,
    hub: ChangeBus,
    events: EventBus,
    observations: Arc<RwLock<Vec<Observation>>>,
    goals: Arc<RwLock<Vec<Goal>>>,
    training_events: Arc<RwLock<Vec<TrainingEvent>>>,
    submissions: Arc<RwLock<Vec<EvidenceSubmission>>>,
}

impl DashboardContext {
    pub fn new(store: CollectionStore, hub: ChangeBus) -> Self {
        Self {
            id: Uuid::new_v4(),
            store,
            hub,
            events: EventBus::new(EVENT_CAPACITY),
            observations: Arc::new(RwLock::new(Vec::new())),
            goals: Arc::new(RwLock::new(Vec::new())),
            training_events: Arc::new(RwLock::new(Vec::new())),
            submissions: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Stable identity of this context, used as the propagation origin tag
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// This context's event bus
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Populate every collection from the store.
    ///
    /// Missing or unreadable collections load as empty; startup never
    /// fails on bad stored data.
    pub async fn load_all(&self) {
        *self.observations.write().await = self.store.load(OBSERVATIONS_KEY, Vec::new()).await;
        *self.goals.write().await = self.store.load(GOALS_KEY, Vec::new()).await;
        *self.training_events.write().await =
            self.store.load(TRAINING_EVENTS_KEY, Vec::new()).await;
        *self.submissions.write().await = self.store.load(MOOC_SUBMISSIONS_KEY, Vec::new()).await;
    }

    /// All observations, unfiltered
    pub async fn observations(&self) -> Vec<Observation> {
        self.observations.read().await.clone()
    }

    /// All goals, unfiltered
    pub async fn goals(&self) -> Vec<Goal> {
        self.goals.read().await.clone()
    }

    /// All training events
    pub async fn training_events(&self) -> Vec<TrainingEvent> {
        self.training_events.read().await.clone()
    }

    /// All evidence submissions
    pub async fn submissions(&self) -> Vec<EvidenceSubmission> {
        self.submissions.read().await.clone()
    }

    /// Observations visible to a viewer: teachers see their own records,
    /// every other role sees the full collection.
    pub async fn observations_for(&self, viewer: &Viewer) -> Vec<Observation> {
        let all = self.observations.read().await;
        if viewer.role != Role::Teacher {
            return all.clone();
        }
        let owner = viewer.owner_ref();
        all.iter()
            .filter(|o| o.owner_ref().matches(&owner))
            .cloned()
            .collect()
    }

    /// Goals visible to a viewer, same visibility rule as observations
    pub async fn goals_for(&self, viewer: &Viewer) -> Vec<Goal> {
        let all = self.goals.read().await;
        if viewer.role != Role::Teacher {
            return all.clone();
        }
        let owner = viewer.owner_ref();
        all.iter()
            .filter(|g| g.owner_ref().matches(&owner))
            .cloned()
            .collect()
    }

    /// Add a freshly submitted observation
    pub async fn add_observation(&self, observation: Observation) -> Result<()> {
        let snapshot = {
            let mut items = self.observations.write().await;
            items.push(observation.clone());
            items.clone()
        };
        self.persist(OBSERVATIONS_KEY, &snapshot).await?;
        self.events.emit_lossy(DomainEvent::ObservationCreated {
            observation,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Attach a teacher reflection to an existing observation
    pub async fn record_reflection(
        &self,
        observation_id: &str,
        text: String,
        detailed: Option<DetailedReflection>,
    ) -> Result<()> {
        let (snapshot, updated) = {
            let mut items = self.observations.write().await;
            let item = items
                .iter_mut()
                .find(|o| o.id == observation_id)
                .ok_or_else(|| {
                    Error::NotFound(format!("Observation not found: {}", observation_id))
                })?;
            item.attach_reflection(text, detailed)?;
            let updated = item.clone();
            (items.clone(), updated)
        };
        self.persist(OBSERVATIONS_KEY, &snapshot).await?;
        self.events.emit_lossy(DomainEvent::ObservationUpdated {
            observation: updated,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Add a new development goal
    pub async fn add_goal(&self, goal: Goal) -> Result<()> {
        let snapshot = {
            let mut items = self.goals.write().await;
            items.push(goal.clone());
            items.clone()
        };
        self.persist(GOALS_KEY, &snapshot).await?;
        self.events.emit_lossy(DomainEvent::GoalCreated {
            goal,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Update a goal's progress; the status label is re-derived
    pub async fn update_goal_progress(&self, goal_id: &str, progress: u8) -> Result<()> {
        let (snapshot, updated) = {
            let mut items = self.goals.write().await;
            let goal = items
                .iter_mut()
                .find(|g| g.id == goal_id)
                .ok_or_else(|| Error::NotFound(format!("Goal not found: {}", goal_id)))?;
            goal.set_progress(progress);
            let updated = goal.clone();
            (items.clone(), updated)
        };
        self.persist(GOALS_KEY, &snapshot).await?;
        self.events.emit_lossy(DomainEvent::GoalUpdated {
            goal: updated,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Register an attendee on a training event
    ///
    /// Rejections (full, duplicate, cancelled) surface as
    /// [`Error::InvalidInput`] and leave state untouched.
    pub async fn register_for_event(&self, event_id: &str, registrant: Registrant) -> Result<()> {
        let snapshot = {
            let mut items = self.training_events.write().await;
            let event = items.iter_mut().find(|e| e.id == event_id).ok_or_else(|| {
                Error::NotFound(format!("Training event not found: {}", event_id))
            })?;
            event.register(registrant)?;
            items.clone()
        };
        self.persist(TRAINING_EVENTS_KEY, &snapshot).await?;
        Ok(())
    }

    /// Record an external-course evidence submission
    pub async fn submit_evidence(&self, submission: EvidenceSubmission) -> Result<()> {
        let snapshot = {
            let mut items = self.submissions.write().await;
            items.push(submission);
            items.clone()
        };
        self.persist(MOOC_SUBMISSIONS_KEY, &snapshot).await?;
        Ok(())
    }

    /// Insert or replace an observation by id (push ingestion).
    ///
    /// Returns true when local state actually changed. An echo of a record
    /// already held verbatim is a no-op and is not re-persisted, so push
    /// echoes cannot start a propagation cycle.
    pub async fn upsert_observation(&self, observation: Observation) -> Result<bool> {
        let snapshot = {
            let mut items = self.observations.write().await;
            match items.iter_mut().find(|o| o.id == observation.id) {
                Some(existing) => {
                    if *existing == observation {
                        return Ok(false);
                    }
                    *existing = observation;
                }
                None => items.push(observation),
            }
            items.clone()
        };
        self.persist(OBSERVATIONS_KEY, &snapshot).await?;
        Ok(true)
    }

    /// Insert or replace a goal by id (push ingestion)
    pub async fn upsert_goal(&self, goal: Goal) -> Result<bool> {
        let snapshot = {
            let mut items = self.goals.write().await;
            match items.iter_mut().find(|g| g.id == goal.id) {
                Some(existing) => {
                    if *existing == goal {
                        return Ok(false);
                    }
                    *existing = goal;
                }
                None => items.push(goal),
            }
            items.clone()
        };
        self.persist(GOALS_KEY, &snapshot).await?;
        Ok(true)
    }

    /// Start the listener that applies other contexts' writes to this one.
    ///
    /// Runs until the hub closes. Notifications originating from this
    /// context are skipped; everything else flows through
    /// [`Self::apply_snapshot`]. A lagged receiver reloads from the store,
    /// which is always at least as new as anything it missed.
    pub fn start_listener(&self) -> tokio::task::JoinHandle<()> {
        let ctx = self.clone();
        let mut rx = self.hub.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(change) => {
                        if change.origin == ctx.id {
                            continue;
                        }
                        ctx.apply_snapshot(&change.key, &change.snapshot).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(
                            "Context {} missed {} change notifications, reloading from store",
                            ctx.id, missed
                        );
                        ctx.load_all().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// Apply a propagated whole-collection snapshot to local state.
    ///
    /// Returns true when local state was replaced. A snapshot equal to the
    /// current in-memory collection is ignored, which is what terminates
    /// notify/apply cycles between contexts. Unparseable snapshots are
    /// logged and dropped; they never panic or clear local state.
    pub async fn apply_snapshot(&self, key: &str, snapshot: &str) -> bool {
        let changed = match key {
            OBSERVATIONS_KEY => replace_if_changed(&self.observations, key, snapshot).await,
            GOALS_KEY => replace_if_changed(&self.goals, key, snapshot).await,
            TRAINING_EVENTS_KEY => replace_if_changed(&self.training_events, key, snapshot).await,
            MOOC_SUBMISSIONS_KEY => replace_if_changed(&self.submissions, key, snapshot).await,
            other => {
                debug!("Ignoring change notification for unknown key '{}'", other);
                return false;
            }
        };

        if changed {
            self.events.emit_lossy(DomainEvent::CollectionRefreshed {
                key: key.to_string(),
                timestamp: Utc::now(),
            });
        }
        changed
    }

    /// Write-through tail shared by every mutating operation: persist the
    /// whole collection, hand the snapshot to other contexts, signal this
    /// context's own consumers.
    async fn persist<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.store.save_raw(key, &json).await?;
        self.hub.notify(key, json, self.id);
        self.events.emit_lossy(DomainEvent::CollectionRefreshed {
            key: key.to_string(),
            timestamp: Utc::now(),
        });
        Ok(())
    }
}

async fn replace_if_changed<T>(slot: &Arc<RwLock<Vec<T>>>, key: &str, snapshot: &str) -> bool
where
    T: serde::de::DeserializeOwned + PartialEq,
{
    let incoming: Vec<T> = match serde_json::from_str(snapshot) {
        Ok(items) => items,
        Err(e) => {
            warn!("Discarding unparseable snapshot for '{}': {}", key, e);
            return false;
        }
    };

    let mut guard = slot.write().await;
    if *guard == incoming {
        return false;
    }
    *guard = incoming;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classroom, Domain, EventStatus, Indicator, Rating};
    use tempfile::TempDir;

    async fn context() -> (TempDir, DashboardContext) {
        let dir = TempDir::new().unwrap();
        let store = CollectionStore::open(&dir.path().join("obsync.db"))
            .await
            .unwrap();
        let hub = ChangeBus::new(16);
        (dir, DashboardContext::new(store, hub))
    }

    fn sample_observation(teacher: &str) -> Observation {
        Observation {
            id: Uuid::new_v4().to_string(),
            teacher: teacher.to_string(),
            teacher_id: None,
            teacher_email: None,
            observer: "Sarah Principal".to_string(),
            observer_role: "Head of School".to_string(),
            campus: "CMR NPS".to_string(),
            date: "2026-02-10".to_string(),
            classroom: Classroom {
                block: "Block A".to_string(),
                grade: "Grade 5".to_string(),
                section: None,
                learning_area: "Mathematics".to_string(),
            },
            domains: vec![Domain {
                domain_id: "3a".to_string(),
                title: "3A. Planning & Preparation".to_string(),
                indicators: vec![Indicator {
                    name: "Standards and Objectives".to_string(),
                    rating: Rating::Effective,
                }],
                evidence: "Clear objectives posted".to_string(),
            }],
            score: 3.0,
            domain: "General Instruction".to_string(),
            routines: vec![],
            culture_tools: vec![],
            instructional_tools: vec![],
            learning_area_tools: vec![],
            discussion_met: true,
            notes: "Strong lesson".to_string(),
            action_step: "Add exit tickets".to_string(),
            meta_tags: vec![],
            has_reflection: false,
            reflection: None,
            teacher_reflection: None,
            detailed_reflection: None,
        }
    }

    fn sample_event(capacity: u32) -> TrainingEvent {
        TrainingEvent {
            id: "evt-1".to_string(),
            title: "Questioning Techniques".to_string(),
            topic: "Instruction".to_string(),
            event_type: "Workshop".to_string(),
            date: "Mar 05, 2026".to_string(),
            time: "10:00 AM".to_string(),
            location: "EJPN Campus".to_string(),
            capacity,
            registered: 0,
            registrants: vec![],
            status: EventStatus::Approved,
        }
    }

    fn drain_types(rx: &mut broadcast::Receiver<DomainEvent>) -> Vec<String> {
        let mut types = Vec::new();
        while let Ok(event) = rx.try_recv() {
            types.push(event.event_type().to_string());
        }
        types
    }

    #[tokio::test]
    async fn test_add_goal_persists_and_signals() {
        let (_dir, ctx) = context().await;
        let mut rx = ctx.events().subscribe();

        let goal = Goal::new("Emily Johnson", "Differentiation", "Instruction", "2026-05-01");
        ctx.add_goal(goal.clone()).await.unwrap();

        assert_eq!(
            drain_types(&mut rx),
            vec!["collection:refreshed", "goal:created"]
        );

        // a second context over the same store sees the write
        let other = DashboardContext::new(ctx.store.clone(), ctx.hub.clone());
        other.load_all().await;
        assert_eq!(other.goals().await, vec![goal]);
    }

    #[tokio::test]
    async fn test_update_goal_progress_rederives_status() {
        let (_dir, ctx) = context().await;
        let goal = Goal::new("Emily Johnson", "Differentiation", "Instruction", "2026-05-01");
        let id = goal.id.clone();
        ctx.add_goal(goal).await.unwrap();

        ctx.update_goal_progress(&id, 50).await.unwrap();
        assert_eq!(ctx.goals().await[0].status, "In Progress");

        let err = ctx.update_goal_progress("missing", 10).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_record_reflection_marks_observation() {
        let (_dir, ctx) = context().await;
        let obs = sample_observation("Emily Johnson");
        let id = obs.id.clone();
        ctx.add_observation(obs).await.unwrap();

        let mut rx = ctx.events().subscribe();
        ctx.record_reflection(&id, "I agree with the feedback".to_string(), None)
            .await
            .unwrap();

        let stored = &ctx.observations().await[0];
        assert!(stored.has_reflection);
        assert_eq!(stored.reflection.as_deref(), Some("I agree with the feedback"));
        assert!(drain_types(&mut rx).contains(&"observation:updated".to_string()));
    }

    #[tokio::test]
    async fn test_apply_snapshot_equality_guard_terminates_cycles() {
        let (_dir, ctx) = context().await;
        let mut rx = ctx.events().subscribe();

        let goals = vec![Goal::new("A", "One", "Instruction", "2026-01-01")];
        let snapshot = serde_json::to_string(&goals).unwrap();

        assert!(ctx.apply_snapshot(GOALS_KEY, &snapshot).await);
        // identical snapshot again: no replacement, no signal
        assert!(!ctx.apply_snapshot(GOALS_KEY, &snapshot).await);
        assert!(!ctx.apply_snapshot(GOALS_KEY, &snapshot).await);

        assert_eq!(drain_types(&mut rx), vec!["collection:refreshed"]);
        assert_eq!(ctx.goals().await, goals);
    }

    #[tokio::test]
    async fn test_apply_snapshot_ignores_bad_payloads() {
        let (_dir, ctx) = context().await;
        let goals = vec![Goal::new("A", "One", "Instruction", "2026-01-01")];
        let snapshot = serde_json::to_string(&goals).unwrap();
        ctx.apply_snapshot(GOALS_KEY, &snapshot).await;

        assert!(!ctx.apply_snapshot(GOALS_KEY, "{broken").await);
        assert!(!ctx.apply_snapshot("unknown_key", "[]").await);
        // local state untouched by either
        assert_eq!(ctx.goals().await, goals);
    }

    #[tokio::test]
    async fn test_register_for_event_writes_through() {
        let (_dir, ctx) = context().await;
        ctx.store
            .save(TRAINING_EVENTS_KEY, &[sample_event(2)])
            .await
            .unwrap();
        ctx.load_all().await;

        let registrant = Registrant {
            id: "u-1".to_string(),
            name: "Emily Johnson".to_string(),
            email: "emily@school.example".to_string(),
            date_registered: Utc::now(),
        };
        ctx.register_for_event("evt-1", registrant.clone())
            .await
            .unwrap();

        let err = ctx
            .register_for_event("evt-1", registrant)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Already registered"));

        // accounting persisted, visible to a fresh context
        let other = DashboardContext::new(ctx.store.clone(), ctx.hub.clone());
        other.load_all().await;
        let events = other.training_events().await;
        assert_eq!(events[0].registered, 1);
        assert_eq!(events[0].registrants.len(), 1);
        assert_eq!(events[0].spots_left(), 1);
    }

    #[tokio::test]
    async fn test_upsert_echo_is_a_noop() {
        let (_dir, ctx) = context().await;
        let obs = sample_observation("Emily Johnson");

        assert!(ctx.upsert_observation(obs.clone()).await.unwrap());
        assert!(!ctx.upsert_observation(obs.clone()).await.unwrap());

        let mut changed = obs;
        changed.notes = "Amended notes".to_string();
        assert!(ctx.upsert_observation(changed).await.unwrap());
        assert_eq!(ctx.observations().await.len(), 1);
    }

    #[tokio::test]
    async fn test_observations_for_filters_by_role() {
        let (_dir, ctx) = context().await;
        ctx.add_observation(sample_observation("Emily Johnson"))
            .await
            .unwrap();
        ctx.add_observation(sample_observation("James Lee"))
            .await
            .unwrap();

        let teacher = Viewer {
            id: String::new(),
            name: "Emily Johnson".to_string(),
            email: "emily@school.example".to_string(),
            role: Role::Teacher,
        };
        let mine = ctx.observations_for(&teacher).await;
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].teacher, "Emily Johnson");

        let leader = Viewer {
            role: Role::Leader,
            ..teacher
        };
        assert_eq!(ctx.observations_for(&leader).await.len(), 2);
    }
}
