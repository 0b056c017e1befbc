//! Screen sessions
//!
//! State containers for the log and settings screens. Each session publishes
//! an immutable state snapshot over a watch channel; the UI renders whatever
//! snapshot it last received and issues commands back to the session.

pub mod log;
pub mod settings;

use chrono::Utc;
use uuid::Uuid;

pub use log::{LogScreenState, LogSession};
pub use settings::{SettingsScreenState, SettingsSession};

/// Source of "now" timestamps, injected so sessions stay deterministic in
/// tests
pub trait Clock: Send + Sync {
    /// Current wall-clock time in milliseconds since the Unix epoch
    fn now_millis(&self) -> i64;
}

/// System wall clock
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Source of unique log entry identifiers
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random UUIDv4 identifiers
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
