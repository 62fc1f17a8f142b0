//! Local persistence for dashboard collections
//!
//! Collections are stored whole: one JSON document per key, replaced on
//! every save. There is no per-record schema, which keeps the store
//! tolerant of model additions (unknown fields survive a round trip as
//! long as readers default them).
//!
//! Reads never fail the caller. A missing key yields the supplied
//! default, and a corrupt document is logged and replaced by the default
//! rather than wedging startup.

pub mod init;

pub use init::*;

use crate::Result;
use serde::{Serialize, de::DeserializeOwned};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::warn;

/// Collection key for observation records.
pub const OBSERVATIONS_KEY: &str = "observations_data";
/// Collection key for professional goals.
pub const GOALS_KEY: &str = "goals_data";
/// Collection key for training events.
pub const TRAINING_EVENTS_KEY: &str = "training_events_data";
/// Collection key for external course evidence submissions.
pub const MOOC_SUBMISSIONS_KEY: &str = "mooc_submissions";

/// Whole-collection key/value store backed by SQLite.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct CollectionStore {
    pool: SqlitePool,
}

impl CollectionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the store at the given path.
    pub async fn open(db_path: &Path) -> Result<Self> {
        let pool = init_store(db_path).await?;
        Ok(Self { pool })
    }

    /// Load a whole collection, falling back to `default` when the key is
    /// missing or its document cannot be parsed.
    pub async fn load<T>(&self, key: &str, default: Vec<T>) -> Vec<T>
    where
        T: DeserializeOwned,
    {
        let row: Option<String> = match sqlx::query_scalar(
            "SELECT value FROM collections WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        {
            Ok(row) => row,
            Err(e) => {
                warn!("Failed to read collection '{}': {}, using default", key, e);
                return default;
            }
        };

        match row {
            Some(json) => match serde_json::from_str(&json) {
                Ok(items) => items,
                Err(e) => {
                    warn!("Corrupt collection '{}': {}, using default", key, e);
                    default
                }
            },
            None => default,
        }
    }

    /// Replace a whole collection with the given items.
    pub async fn save<T>(&self, key: &str, items: &[T]) -> Result<()>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(items)?;
        self.save_raw(key, &json).await
    }

    /// Replace a collection with an already-serialized JSON document.
    ///
    /// The change propagator ships collection snapshots between contexts
    /// as JSON text; this lets the receiving side persist the snapshot
    /// without a decode/re-encode cycle.
    pub async fn save_raw(&self, key: &str, json: &str) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO collections (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)",
        )
        .bind(key)
        .bind(json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Write first-run defaults for a collection.
    ///
    /// Does nothing if the key already exists, so calling this on every
    /// startup is safe.
    pub async fn seed<T>(&self, key: &str, items: &[T]) -> Result<()>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(items)?;
        sqlx::query("INSERT OR IGNORE INTO collections (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(&json)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Goal;
    use tempfile::TempDir;

    async fn open_temp() -> (TempDir, CollectionStore) {
        let dir = TempDir::new().unwrap();
        let store = CollectionStore::open(&dir.path().join("obsync.db"))
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_load_missing_key_returns_default() {
        let (_dir, store) = open_temp().await;

        let goals: Vec<Goal> = store.load(GOALS_KEY, Vec::new()).await;
        assert!(goals.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let (_dir, store) = open_temp().await;

        let goals = vec![
            Goal::new("Sarah Smith", "Improve questioning", "Instruction", "2026-06-30"),
            Goal::new("James Lee", "Routines refresh", "Classroom Culture", "2026-05-15"),
        ];
        store.save(GOALS_KEY, &goals).await.unwrap();

        let loaded: Vec<Goal> = store.load(GOALS_KEY, Vec::new()).await;
        assert_eq!(loaded, goals);
    }

    #[tokio::test]
    async fn test_save_replaces_whole_collection() {
        let (_dir, store) = open_temp().await;

        let first = vec![
            Goal::new("A", "One", "Instruction", "2026-01-01"),
            Goal::new("B", "Two", "Instruction", "2026-01-01"),
            Goal::new("C", "Three", "Instruction", "2026-01-01"),
        ];
        store.save(GOALS_KEY, &first).await.unwrap();

        let second = vec![Goal::new("D", "Four", "Instruction", "2026-01-01")];
        store.save(GOALS_KEY, &second).await.unwrap();

        let loaded: Vec<Goal> = store.load(GOALS_KEY, Vec::new()).await;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].teacher, "D");
    }

    #[tokio::test]
    async fn test_corrupt_document_falls_back_to_default() {
        let (_dir, store) = open_temp().await;

        store.save_raw(GOALS_KEY, "{not valid json").await.unwrap();

        let loaded: Vec<Goal> = store.load(GOALS_KEY, Vec::new()).await;
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_seed_does_not_overwrite_existing_data() {
        let (_dir, store) = open_temp().await;

        let existing = vec![Goal::new("Kept", "Original", "Instruction", "2026-01-01")];
        store.save(GOALS_KEY, &existing).await.unwrap();

        let defaults = vec![Goal::new("Seeded", "Ignored", "Instruction", "2026-01-01")];
        store.seed(GOALS_KEY, &defaults).await.unwrap();

        let loaded: Vec<Goal> = store.load(GOALS_KEY, Vec::new()).await;
        assert_eq!(loaded[0].teacher, "Kept");
    }

    #[tokio::test]
    async fn test_seed_populates_missing_key() {
        let (_dir, store) = open_temp().await;

        let defaults = vec![Goal::new("Seeded", "First run", "Instruction", "2026-01-01")];
        store.seed(GOALS_KEY, &defaults).await.unwrap();

        let loaded: Vec<Goal> = store.load(GOALS_KEY, Vec::new()).await;
        assert_eq!(loaded[0].teacher, "Seeded");
    }

    #[tokio::test]
    async fn test_open_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("data").join("obsync").join("obsync.db");

        let store = CollectionStore::open(&nested).await.unwrap();
        store.save(OBSERVATIONS_KEY, &Vec::<Goal>::new()).await.unwrap();

        assert!(nested.exists());
    }
}
