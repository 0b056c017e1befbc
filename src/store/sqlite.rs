//! SQLite log entry backend
//!
//! Wraps the pooled [`Database`] and runs the blocking rusqlite calls on the
//! tokio blocking pool so store operations never stall the async runtime.

use async_trait::async_trait;
use tokio::task;

use crate::db::Database;
use crate::models::LogEntry;

use super::{LogEntryBackend, StoreResult};

/// Durable backend over the pooled SQLite database
#[derive(Clone)]
pub struct SqliteBackend {
    db: Database,
}

impl SqliteBackend {
    /// Wrap an already-migrated database
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LogEntryBackend for SqliteBackend {
    async fn upsert(&self, entry: &LogEntry) -> StoreResult<()> {
        let db = self.db.clone();
        let entry = entry.clone();
        task::spawn_blocking(move || db.with_conn(|conn| LogEntry::upsert(conn, &entry)))
            .await??;
        Ok(())
    }

    async fn update(&self, entry: &LogEntry) -> StoreResult<bool> {
        let db = self.db.clone();
        let entry = entry.clone();
        let matched =
            task::spawn_blocking(move || db.with_conn(|conn| LogEntry::update(conn, &entry)))
                .await??;
        Ok(matched)
    }

    async fn delete_by_id(&self, id: &str) -> StoreResult<bool> {
        let db = self.db.clone();
        let id = id.to_string();
        let deleted =
            task::spawn_blocking(move || db.with_conn(|conn| LogEntry::delete_by_id(conn, &id)))
                .await??;
        Ok(deleted)
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<LogEntry>> {
        let db = self.db.clone();
        let id = id.to_string();
        let entry =
            task::spawn_blocking(move || db.with_conn(|conn| LogEntry::get_by_id(conn, &id)))
                .await??;
        Ok(entry)
    }

    async fn get_all(&self) -> StoreResult<Vec<LogEntry>> {
        let db = self.db.clone();
        let entries = task::spawn_blocking(move || db.with_conn(LogEntry::get_all)).await??;
        Ok(entries)
    }
}
