//! Daily target calculations
//!
//! Pure functions mapping a user profile to daily calorie and macronutrient
//! targets, plus the arithmetic for summarizing a day's log against those
//! targets. Everything here is O(1) and side-effect free, so it is safe to
//! recompute on every keystroke of a profile edit.
//!
//! Formulas:
//! - Base expenditure is Mifflin-St Jeor BMR scaled by a fixed
//!   lightly-active factor of 1.375.
//! - Goal speed adds/subtracts a fixed daily delta (250/500/750 kcal),
//!   negative for lose, positive for gain, zero for maintain.
//! - Protein is 1.8 g per kg body weight, fat is 25% of target calories at
//!   9 kcal/g, and carbs absorb the remaining calories at 4 kcal/g.

use serde::{Deserialize, Serialize};

use crate::models::{Gender, GoalType, UserProfile};

/// Activity multiplier applied to BMR (lightly active)
const ACTIVITY_FACTOR: f64 = 1.375;

/// Protein target, grams per kilogram of body weight
const PROTEIN_G_PER_KG: f64 = 1.8;

/// Share of target calories allotted to fat
const FAT_CALORIE_SHARE: f64 = 0.25;

const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARB: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

/// Daily calorie and macro targets derived from a user profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatedTargets {
    /// kcal per day
    pub calories: i32,
    /// grams per day
    pub protein: i32,
    /// grams per day
    pub fat: i32,
    /// grams per day
    pub carbs: i32,
}

/// Mifflin-St Jeor basal metabolic rate, kcal per day
fn basal_metabolic_rate(profile: &UserProfile) -> f64 {
    let base = 10.0 * profile.weight_kg + 6.25 * f64::from(profile.height_cm)
        - 5.0 * f64::from(profile.age);
    match profile.gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Daily calorie target: activity-scaled BMR plus the goal adjustment
pub fn calculate_target_calories(profile: &UserProfile) -> i32 {
    let maintenance = basal_metabolic_rate(profile) * ACTIVITY_FACTOR;

    let delta = match profile.goal_type {
        GoalType::Lose => -profile.goal_speed.calorie_delta(),
        GoalType::Maintain => 0,
        GoalType::Gain => profile.goal_speed.calorie_delta(),
    };

    (maintenance + f64::from(delta)).round() as i32
}

/// Daily protein target in grams (fixed grams per kg body weight)
pub fn calculate_protein_target(profile: &UserProfile) -> i32 {
    (profile.weight_kg * PROTEIN_G_PER_KG).round() as i32
}

/// Daily fat target in grams (fixed share of target calories)
pub fn calculate_fat_target(profile: &UserProfile) -> i32 {
    let calories = f64::from(calculate_target_calories(profile));
    (calories * FAT_CALORIE_SHARE / KCAL_PER_G_FAT).round() as i32
}

/// Daily carb target in grams (calories left after protein and fat)
pub fn calculate_carb_target(profile: &UserProfile) -> i32 {
    let calories = f64::from(calculate_target_calories(profile));
    let protein_kcal = f64::from(calculate_protein_target(profile)) * KCAL_PER_G_PROTEIN;
    let fat_kcal = f64::from(calculate_fat_target(profile)) * KCAL_PER_G_FAT;

    let remaining = (calories - protein_kcal - fat_kcal).max(0.0);
    (remaining / KCAL_PER_G_CARB).round() as i32
}

/// Compute all targets for a profile
pub fn calculate_targets(profile: &UserProfile) -> CalculatedTargets {
    CalculatedTargets {
        calories: calculate_target_calories(profile),
        protein: calculate_protein_target(profile),
        fat: calculate_fat_target(profile),
        carbs: calculate_carb_target(profile),
    }
}

/// A day's calorie ledger measured against the target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    pub goal: i32,
    pub consumed: i32,
    pub burned: i32,
    pub remaining: i32,
}

/// Summarize logged entries against a calorie goal
///
/// Consumed is the sum of food calories, burned the sum of exercise
/// calories; remaining is goal minus consumed plus burned.
pub fn summarize_day(entries: &[crate::models::LogEntry], goal: i32) -> DailySummary {
    let mut consumed = 0;
    let mut burned = 0;
    for entry in entries {
        match entry.entry_type {
            crate::models::EntryType::Food => consumed += entry.calories,
            crate::models::EntryType::Exercise => burned += entry.calories,
        }
    }

    DailySummary {
        goal,
        consumed,
        burned,
        remaining: goal - consumed + burned,
    }
}
