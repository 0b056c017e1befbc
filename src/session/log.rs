//! Log screen session
//!
//! Owns the ingestion pipeline: free text or a captured image goes to the
//! classifier, a successful classification becomes a log entry written
//! through the store, and the refreshed entry list flows back into the
//! published screen state.
//!
//! Submissions run concurrently; the single `is_loading` flag is backed by
//! an in-flight counter and stays set while any submission is pending. The
//! error message is last-write-wins. Dropping a submission future before the
//! classifier resolves persists nothing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::classifier::{Classifier, ProcessingResult};
use crate::models::{ClassifiedInput, EntryType, LogEntry};
use crate::store::LogStore;

use super::{Clock, IdGenerator};

/// Snapshot of the log screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogScreenState {
    pub input_text: String,
    pub entries: Vec<LogEntry>,
    pub editing_entry_id: Option<String>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

/// State container for the log screen
pub struct LogSession {
    store: Arc<LogStore>,
    classifier: Arc<dyn Classifier>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    state: Arc<watch::Sender<LogScreenState>>,
    in_flight: AtomicUsize,
    entries_task: JoinHandle<()>,
}

impl LogSession {
    /// Create a session and start mirroring the store's entry list into the
    /// published state
    pub fn new(
        store: Arc<LogStore>,
        classifier: Arc<dyn Classifier>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let mut entries_rx = store.observe_all();

        let initial = LogScreenState {
            entries: entries_rx.borrow().clone(),
            ..LogScreenState::default()
        };
        let state = Arc::new(watch::channel(initial).0);

        let entries_state = Arc::clone(&state);
        let entries_task = tokio::spawn(async move {
            while entries_rx.changed().await.is_ok() {
                let entries = entries_rx.borrow().clone();
                entries_state.send_modify(|s| s.entries = entries);
            }
        });

        Self {
            store,
            classifier,
            clock,
            ids,
            state,
            in_flight: AtomicUsize::new(0),
            entries_task,
        }
    }

    /// Subscribe to screen state snapshots
    pub fn observe(&self) -> watch::Receiver<LogScreenState> {
        self.state.subscribe()
    }

    /// Current screen state
    pub fn state(&self) -> LogScreenState {
        self.state.borrow().clone()
    }

    /// Replace the free-text input field
    pub fn update_input_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_modify(|s| s.input_text = text);
    }

    /// Submit the current input text for classification
    ///
    /// Returns `None` without submitting when the trimmed input is empty;
    /// otherwise resolves to the submission's single terminal outcome.
    pub async fn process_log_entry(&self) -> Option<ProcessingResult> {
        let input = self.state.borrow().input_text.trim().to_string();
        if input.is_empty() {
            return None;
        }

        let _guard = self.begin_submission();

        let outcome = match self.classifier.classify_text(&input).await {
            Ok(data) => {
                let outcome = self.insert_classified(data).await;
                if matches!(outcome, ProcessingResult::Success(_)) {
                    self.state.send_modify(|s| s.input_text.clear());
                }
                outcome
            }
            Err(e) => self.record_error(e.to_string()),
        };

        Some(outcome)
    }

    /// Submit a captured food image for classification
    pub async fn process_food_image(&self, image: &[u8], mime_type: &str) -> ProcessingResult {
        let _guard = self.begin_submission();

        match self.classifier.classify_image(image, mime_type).await {
            Ok(data) => self.insert_classified(data).await,
            Err(e) => self.record_error(e.to_string()),
        }
    }

    /// Begin editing an entry: mirror its name into the input field
    pub fn edit_entry(&self, entry: &LogEntry) {
        let name = entry.name.clone();
        let id = entry.id.clone();
        self.state.send_modify(|s| {
            s.input_text = name;
            s.editing_entry_id = Some(id);
        });
    }

    /// Apply an edit as a full replacement keyed by the entry's id
    ///
    /// A missing id is a no-op. Store failures surface as the screen's error
    /// message.
    pub async fn apply_edit(&self, entry: LogEntry) {
        match self.store.update(&entry).await {
            Ok(matched) => {
                if !matched {
                    debug!(id = %entry.id, "edited entry no longer exists");
                }
                self.state.send_modify(|s| {
                    s.editing_entry_id = None;
                    s.input_text.clear();
                });
            }
            Err(e) => {
                warn!(error = %e, "failed to save edited entry");
                self.state
                    .send_modify(|s| s.error_message = Some(e.to_string()));
            }
        }
    }

    /// Delete an entry; deleting an already-gone entry is a no-op
    pub async fn delete_entry(&self, entry: &LogEntry) {
        if let Err(e) = self.store.delete(entry).await {
            warn!(error = %e, "failed to delete entry");
            self.state
                .send_modify(|s| s.error_message = Some(e.to_string()));
        }
    }

    /// Build a log entry from a classification and write it to the store
    async fn insert_classified(&self, data: ClassifiedInput) -> ProcessingResult {
        let (name, calories, macros, entry_type) = match &data {
            ClassifiedInput::Nutrition(n) => {
                (n.name.clone(), n.calories, n.to_macros_string(), EntryType::Food)
            }
            ClassifiedInput::Exercise(e) => {
                (e.name.clone(), e.calories, e.to_macros_string(), EntryType::Exercise)
            }
        };

        let entry = LogEntry {
            id: self.ids.generate(),
            name,
            calories,
            macros,
            entry_type,
            timestamp: self.clock.now_millis(),
        };

        match self.store.insert(&entry).await {
            Ok(()) => ProcessingResult::Success(data),
            Err(e) => {
                warn!(error = %e, "failed to persist classified entry");
                self.record_error(e.to_string())
            }
        }
    }

    fn record_error(&self, message: String) -> ProcessingResult {
        self.state
            .send_modify(|s| s.error_message = Some(message.clone()));
        ProcessingResult::Error(message)
    }

    fn begin_submission(&self) -> SubmissionGuard<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error_message = None;
        });
        SubmissionGuard { session: self }
    }
}

impl Drop for LogSession {
    fn drop(&mut self) {
        // Release the store subscription when the screen goes away
        self.entries_task.abort();
    }
}

/// Clears the loading flag when a submission finishes or is cancelled
struct SubmissionGuard<'a> {
    session: &'a LogSession,
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.session.in_flight.fetch_sub(1, Ordering::SeqCst);
        // Re-read inside the closure: a submission beginning between the
        // decrement and this write must not have its loading flag clobbered
        let in_flight = &self.session.in_flight;
        self.session
            .state
            .send_modify(|s| s.is_loading = in_flight.load(Ordering::SeqCst) > 0);
    }
}
