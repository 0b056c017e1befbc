//! Classifier payload types
//!
//! Structured nutrition and exercise data produced by the AI classifier from
//! free text or an image. Transient values; they only live long enough to be
//! turned into log entries.

use serde::{Deserialize, Serialize};

/// Nutrition facts for a single recognized food
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionData {
    pub name: String,
    pub calories: i32,
    pub protein_grams: i32,
    pub carb_grams: i32,
    pub fat_grams: i32,
}

impl NutritionData {
    /// Render the macro breakdown in the fixed display format
    pub fn to_macros_string(&self) -> String {
        format!(
            "Protein: {}g, Fat: {}g, Carbs: {}g",
            self.protein_grams, self.fat_grams, self.carb_grams
        )
    }
}

/// A recognized exercise with its estimated calorie burn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseData {
    pub name: String,
    pub calories: i32,
    /// Free-text duration/distance summary, e.g. "30 minutes, 5km"
    pub summary: String,
}

impl ExerciseData {
    /// Render the detail summary for display
    pub fn to_macros_string(&self) -> String {
        self.summary.clone()
    }
}

/// The two payload shapes a successful classification can produce
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum ClassifiedInput {
    Nutrition(NutritionData),
    Exercise(ExerciseData),
}
