//! In-memory log entry backend
//!
//! Mutexed map keyed by entry id. Used by tests and as a lightweight
//! provider when durability is not needed.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::LogEntry;

use super::{LogEntryBackend, StoreResult};

/// In-memory backend over a mutexed map
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, LogEntry>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LogEntryBackend for MemoryBackend {
    async fn upsert(&self, entry: &LogEntry) -> StoreResult<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(entry.id.clone(), entry.clone());
        Ok(())
    }

    async fn update(&self, entry: &LogEntry) -> StoreResult<bool> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get_mut(&entry.id) {
            Some(existing) => {
                *existing = entry.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, id: &str) -> StoreResult<bool> {
        let mut entries = self.entries.lock().unwrap();
        Ok(entries.remove(id).is_some())
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<LogEntry>> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.get(id).cloned())
    }

    async fn get_all(&self) -> StoreResult<Vec<LogEntry>> {
        let entries = self.entries.lock().unwrap();
        let mut all: Vec<_> = entries.values().cloned().collect();
        // Newest first, id as a deterministic tie-breaker
        all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(a.id.cmp(&b.id)));
        Ok(all)
    }
}
