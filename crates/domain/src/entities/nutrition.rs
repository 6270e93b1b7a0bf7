//! Nutrition analysis entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed nutrition analysis, kept in local history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionRecord {
    /// Ingredients that were analyzed
    pub ingredients: Vec<String>,
    /// Rendered analysis as returned by the backend
    pub analysis: String,
    /// When the analysis ran
    pub analyzed_at: DateTime<Utc>,
}

impl NutritionRecord {
    /// Create a new record stamped with the current time
    pub fn new(ingredients: Vec<String>, analysis: impl Into<String>) -> Self {
        Self {
            ingredients,
            analysis: analysis.into(),
            analyzed_at: Utc::now(),
        }
    }
}
