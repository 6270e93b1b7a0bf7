//! Meal plan entities

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;

/// Parameters for requesting a meal plan from the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealPlanRequest {
    /// Number of days to plan for (1-30)
    pub days: u16,
    /// First day of the plan
    pub start_date: NaiveDate,
    /// Dietary profile (e.g. "balanced", "vegetarian")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diet: Option<String>,
    /// Daily calorie target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
}

impl MealPlanRequest {
    /// Create a request starting today
    #[must_use]
    pub fn new(days: u16) -> Self {
        Self {
            days,
            start_date: Utc::now().date_naive(),
            diet: None,
            calories: None,
        }
    }

    /// Set the dietary profile
    #[must_use]
    pub fn with_diet(mut self, diet: impl Into<String>) -> Self {
        self.diet = Some(diet.into());
        self
    }

    /// Set the daily calorie target
    #[must_use]
    pub const fn with_calories(mut self, calories: u32) -> Self {
        self.calories = Some(calories);
        self
    }

    /// Last day covered by the plan (inclusive)
    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        self.start_date + Duration::days(i64::from(self.days.saturating_sub(1)))
    }

    /// Validate the requested plan length
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.days == 0 || self.days > 30 {
            return Err(DomainError::InvalidPlanLength { days: self.days });
        }
        Ok(())
    }
}

/// A meal plan the user chose to keep locally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedMealPlan {
    /// Unique plan identifier
    pub id: Uuid,
    /// User-chosen name
    pub name: String,
    /// Rendered plan content as returned by the backend
    pub content: String,
    /// When the plan was saved
    pub saved_at: DateTime<Utc>,
}

impl SavedMealPlan {
    /// Create a new saved plan
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            content: content.into(),
            saved_at: Utc::now(),
        }
    }
}
