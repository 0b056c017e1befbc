//! User profile model
//!
//! Immutable profile value that drives the daily target calculations. A new
//! value is constructed on every edit; the profile itself is never persisted
//! by this crate.

use serde::{Deserialize, Serialize};

/// Biological gender, as used by the energy-expenditure formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// What the user is trying to do with their weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Lose,
    Maintain,
    Gain,
}

/// How aggressively to pursue a lose/gain goal
///
/// Only meaningful when the goal type is not [`GoalType::Maintain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalSpeed {
    Slow,
    Moderate,
    Fast,
}

impl GoalSpeed {
    /// Human-readable description for display
    pub fn description(&self) -> &'static str {
        match self {
            GoalSpeed::Slow => "Slow (about 0.25 kg per week)",
            GoalSpeed::Moderate => "Moderate (about 0.5 kg per week)",
            GoalSpeed::Fast => "Fast (about 0.75 kg per week)",
        }
    }

    /// Daily calorie adjustment associated with this speed, in kcal
    ///
    /// Applied negative for a lose goal, positive for a gain goal.
    pub fn calorie_delta(&self) -> i32 {
        match self {
            GoalSpeed::Slow => 250,
            GoalSpeed::Moderate => 500,
            GoalSpeed::Fast => 750,
        }
    }
}

/// User profile driving the target calculations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: u32,
    pub gender: Gender,
    pub height_cm: u32,
    pub weight_kg: f64,
    pub goal_type: GoalType,
    pub goal_speed: GoalSpeed,
}

impl Default for UserProfile {
    fn default() -> Self {
        // Sample profile used before the user has entered their own data
        Self {
            age: 23,
            gender: Gender::Male,
            height_cm: 177,
            weight_kg: 77.0,
            goal_type: GoalType::Lose,
            goal_speed: GoalSpeed::Moderate,
        }
    }
}
