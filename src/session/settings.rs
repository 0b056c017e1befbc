//! Settings screen session
//!
//! Holds the profile edit fields as raw text plus the profile and targets
//! derived from them. Every field change re-parses the inputs and, when they
//! are all valid, rebuilds the profile and recomputes the targets. A parse
//! failure skips the recomputation wholesale so the previous profile and
//! targets stay on screen, never a partial result.

use tokio::sync::watch;

use crate::models::{Gender, GoalSpeed, GoalType, UserProfile};
use crate::targets::{self, CalculatedTargets};

/// Snapshot of the settings screen
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsScreenState {
    pub profile: UserProfile,
    pub age_input: String,
    pub height_input: String,
    pub weight_input: String,
    pub selected_gender: Gender,
    pub selected_goal_type: GoalType,
    pub selected_goal_speed: GoalSpeed,
    pub targets: CalculatedTargets,
    pub save_success: bool,
}

impl SettingsScreenState {
    fn from_profile(profile: UserProfile) -> Self {
        let targets = targets::calculate_targets(&profile);
        Self {
            age_input: profile.age.to_string(),
            height_input: profile.height_cm.to_string(),
            weight_input: profile.weight_kg.to_string(),
            selected_gender: profile.gender,
            selected_goal_type: profile.goal_type,
            selected_goal_speed: profile.goal_speed,
            targets,
            save_success: false,
            profile,
        }
    }
}

/// State container for the settings screen
pub struct SettingsSession {
    state: watch::Sender<SettingsScreenState>,
}

impl SettingsSession {
    /// Create a session seeded from an initial profile
    pub fn new(profile: UserProfile) -> Self {
        let (state, _) = watch::channel(SettingsScreenState::from_profile(profile));
        Self { state }
    }

    /// Subscribe to screen state snapshots
    pub fn observe(&self) -> watch::Receiver<SettingsScreenState> {
        self.state.subscribe()
    }

    /// Current screen state
    pub fn state(&self) -> SettingsScreenState {
        self.state.borrow().clone()
    }

    pub fn update_age(&self, age: impl Into<String>) {
        let age = age.into();
        self.edit(|s| s.age_input = age);
    }

    pub fn update_height(&self, height: impl Into<String>) {
        let height = height.into();
        self.edit(|s| s.height_input = height);
    }

    pub fn update_weight(&self, weight: impl Into<String>) {
        let weight = weight.into();
        self.edit(|s| s.weight_input = weight);
    }

    pub fn update_gender(&self, gender: Gender) {
        self.edit(|s| s.selected_gender = gender);
    }

    pub fn update_goal_type(&self, goal_type: GoalType) {
        self.edit(|s| s.selected_goal_type = goal_type);
    }

    pub fn update_goal_speed(&self, goal_speed: GoalSpeed) {
        self.edit(|s| s.selected_goal_speed = goal_speed);
    }

    /// Mark the current profile as saved
    ///
    /// Persisting the profile belongs to the host application; this only
    /// raises the confirmation flag, which the next edit clears.
    pub fn save_profile(&self) {
        self.state.send_modify(|s| s.save_success = true);
    }

    /// Apply a field edit, then recompute the profile and targets if every
    /// numeric input parses
    fn edit<F: FnOnce(&mut SettingsScreenState)>(&self, apply: F) {
        self.state.send_modify(|s| {
            apply(s);
            s.save_success = false;

            let age = match s.age_input.trim().parse::<u32>() {
                Ok(v) => v,
                Err(_) => return,
            };
            let height_cm = match s.height_input.trim().parse::<u32>() {
                Ok(v) => v,
                Err(_) => return,
            };
            let weight_kg = match s.weight_input.trim().parse::<f64>() {
                Ok(v) => v,
                Err(_) => return,
            };

            let profile = UserProfile {
                age,
                gender: s.selected_gender,
                height_cm,
                weight_kg,
                goal_type: s.selected_goal_type,
                goal_speed: s.selected_goal_speed,
            };
            s.targets = targets::calculate_targets(&profile);
            s.profile = profile;
        });
    }
}
