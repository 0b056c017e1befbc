//! Log store synchronizer
//!
//! CRUD plus continuous observation over the collection of log entries. The
//! store writes through an abstract backend and republishes the full ordered
//! snapshot to every subscriber after each committed mutation.

pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::debug;

use crate::models::LogEntry;

pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("persistence failure: {0}")]
    Persistence(#[from] crate::db::DbError),

    #[error("storage task failed: {0}")]
    Background(#[from] tokio::task::JoinError),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Durable storage for log entries
///
/// `get_all` returns entries ordered by timestamp descending. `update` and
/// `delete_by_id` report whether a matching entry existed, so callers can
/// treat a miss as a no-op without another round trip.
#[async_trait]
pub trait LogEntryBackend: Send + Sync {
    /// Insert an entry, replacing any existing entry with the same id
    async fn upsert(&self, entry: &LogEntry) -> StoreResult<()>;

    /// Replace the entry matching the given id; false when no entry matched
    async fn update(&self, entry: &LogEntry) -> StoreResult<bool>;

    /// Delete the entry with the given id; false when no entry matched
    async fn delete_by_id(&self, id: &str) -> StoreResult<bool>;

    /// Point lookup by id
    async fn get_by_id(&self, id: &str) -> StoreResult<Option<LogEntry>>;

    /// All entries, most recent first
    async fn get_all(&self) -> StoreResult<Vec<LogEntry>>;
}

/// Observable log store over a durable backend
///
/// Mutations are serialized internally so the snapshot channel republishes
/// in commit order. Observers get the current snapshot immediately on
/// subscription and a fresh full snapshot after every mutation.
pub struct LogStore {
    backend: Arc<dyn LogEntryBackend>,
    snapshot: watch::Sender<Vec<LogEntry>>,
    write_lock: Mutex<()>,
}

impl LogStore {
    /// Open a store over the given backend, seeding the snapshot from it
    pub async fn new(backend: Arc<dyn LogEntryBackend>) -> StoreResult<Self> {
        let initial = backend.get_all().await?;
        let (snapshot, _) = watch::channel(initial);
        Ok(Self {
            backend,
            snapshot,
            write_lock: Mutex::new(()),
        })
    }

    /// Subscribe to the continuously-updated full entry list
    pub fn observe_all(&self) -> watch::Receiver<Vec<LogEntry>> {
        self.snapshot.subscribe()
    }

    /// Subscribe to a single entry by id
    ///
    /// Emits `None` once the entry is deleted; the subscription stays alive
    /// in case the id is reinserted. The forwarding task exits when either
    /// the store or the receiver is dropped.
    pub fn observe_by_id(&self, id: &str) -> watch::Receiver<Option<LogEntry>> {
        let mut all = self.snapshot.subscribe();
        let id = id.to_string();

        let current = all.borrow().iter().find(|e| e.id == id).cloned();
        let (tx, rx) = watch::channel(current);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    changed = all.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let next = all.borrow().iter().find(|e| e.id == id).cloned();
                        tx.send_if_modified(|current| {
                            if *current != next {
                                *current = next;
                                true
                            } else {
                                false
                            }
                        });
                    }
                    () = tx.closed() => break,
                }
            }
        });

        rx
    }

    /// Point lookup by id
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<LogEntry>> {
        self.backend.get_by_id(id).await
    }

    /// Insert an entry (insert-or-replace keyed by id)
    pub async fn insert(&self, entry: &LogEntry) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        self.backend.upsert(entry).await?;
        self.republish().await
    }

    /// Replace the entry with the matching id
    ///
    /// A missing id is a no-op: nothing is written and no snapshot is
    /// republished. Returns whether an entry matched.
    pub async fn update(&self, entry: &LogEntry) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        let matched = self.backend.update(entry).await?;
        if matched {
            self.republish().await?;
        } else {
            debug!(id = %entry.id, "update matched no entry");
        }
        Ok(matched)
    }

    /// Delete an entry
    pub async fn delete(&self, entry: &LogEntry) -> StoreResult<bool> {
        self.delete_by_id(&entry.id).await
    }

    /// Delete the entry with the given id
    ///
    /// A missing id is a no-op, not an error. Returns whether an entry was
    /// deleted.
    pub async fn delete_by_id(&self, id: &str) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        let deleted = self.backend.delete_by_id(id).await?;
        if deleted {
            self.republish().await?;
        } else {
            debug!(id, "delete matched no entry");
        }
        Ok(deleted)
    }

    /// Re-read the backend and publish a fresh snapshot
    async fn republish(&self) -> StoreResult<()> {
        let entries = self.backend.get_all().await?;
        self.snapshot.send_replace(entries);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryType;

    fn entry(id: &str, name: &str, timestamp: i64) -> LogEntry {
        LogEntry {
            id: id.to_string(),
            name: name.to_string(),
            calories: 100,
            macros: "Protein: 5g, Fat: 2g, Carbs: 10g".to_string(),
            entry_type: EntryType::Food,
            timestamp,
        }
    }

    async fn memory_store() -> LogStore {
        LogStore::new(Arc::new(MemoryBackend::new())).await.unwrap()
    }

    #[tokio::test]
    async fn test_new_observer_sees_current_snapshot() {
        let store = memory_store().await;
        store.insert(&entry("a", "Oatmeal", 1_000)).await.unwrap();

        let rx = store.observe_all();
        assert_eq!(rx.borrow().len(), 1);
        assert_eq!(rx.borrow()[0].name, "Oatmeal");
    }

    #[tokio::test]
    async fn test_insert_republishes_newest_first() {
        let store = memory_store().await;
        let mut rx = store.observe_all();

        store.insert(&entry("a", "Oatmeal", 1_000)).await.unwrap();
        rx.changed().await.unwrap();
        store.insert(&entry("b", "Lunch", 2_000)).await.unwrap();
        rx.changed().await.unwrap();

        let names: Vec<_> = rx.borrow().iter().map(|e| e.name.clone()).collect();
        assert_eq!(names, vec!["Lunch", "Oatmeal"]);
    }

    #[tokio::test]
    async fn test_insert_same_id_is_upsert() {
        let store = memory_store().await;
        store.insert(&entry("a", "Oatmeal", 1_000)).await.unwrap();
        store.insert(&entry("a", "Granola", 2_000)).await.unwrap();

        let rx = store.observe_all();
        assert_eq!(rx.borrow().len(), 1);
        assert_eq!(rx.borrow()[0].name, "Granola");
    }

    #[tokio::test]
    async fn test_update_missing_id_is_silent_noop() {
        let store = memory_store().await;
        store.insert(&entry("a", "Oatmeal", 1_000)).await.unwrap();

        let rx = store.observe_all();
        let matched = store.update(&entry("missing", "Ghost", 2_000)).await.unwrap();

        assert!(!matched);
        assert!(!rx.has_changed().unwrap());
        assert_eq!(rx.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_silent_noop() {
        let store = memory_store().await;
        store.insert(&entry("a", "Oatmeal", 1_000)).await.unwrap();

        let rx = store.observe_all();
        let deleted = store.delete_by_id("missing").await.unwrap();

        assert!(!deleted);
        assert!(!rx.has_changed().unwrap());
        assert_eq!(rx.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let store = memory_store().await;
        store.insert(&entry("a", "Oatmeal", 1_000)).await.unwrap();

        let mut edited = entry("a", "Oatmeal with honey", 1_000);
        edited.calories = 250;
        assert!(store.update(&edited).await.unwrap());

        let fetched = store.get_by_id("a").await.unwrap().unwrap();
        assert_eq!(fetched.name, "Oatmeal with honey");
        assert_eq!(fetched.calories, 250);
    }

    #[tokio::test]
    async fn test_observe_by_id_tracks_deletion() {
        let store = memory_store().await;
        store.insert(&entry("a", "Oatmeal", 1_000)).await.unwrap();

        let mut rx = store.observe_by_id("a");
        assert_eq!(rx.borrow().as_ref().unwrap().name, "Oatmeal");

        store.delete_by_id("a").await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }

    #[tokio::test]
    async fn test_observe_by_id_releases_subscription_when_receiver_drops() {
        let store = memory_store().await;
        store.insert(&entry("a", "Oatmeal", 1_000)).await.unwrap();

        let rx = store.observe_by_id("a");
        assert_eq!(store.snapshot.receiver_count(), 1);
        drop(rx);

        // The forwarding task must notice the dropped receiver and drop its
        // own store subscription without waiting for another mutation
        let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(1);
        while store.snapshot.receiver_count() > 0 {
            assert!(
                tokio::time::Instant::now() < deadline,
                "forwarding task still subscribed"
            );
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
    }

    #[tokio::test]
    async fn test_observe_by_id_sees_updates() {
        let store = memory_store().await;
        store.insert(&entry("a", "Oatmeal", 1_000)).await.unwrap();

        let mut rx = store.observe_by_id("a");

        let mut edited = entry("a", "Oatmeal", 1_000);
        edited.calories = 300;
        store.update(&edited).await.unwrap();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref().unwrap().calories, 300);
    }
}
