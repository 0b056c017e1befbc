//! Data models
//!
//! Rust structs representing log entries, profile data, and classifier
//! payloads.

mod log_entry;
mod nutrition;
mod profile;

pub use log_entry::{EntryType, LogEntry};
pub use nutrition::{ClassifiedInput, ExerciseData, NutritionData};
pub use profile::{Gender, GoalSpeed, GoalType, UserProfile};
