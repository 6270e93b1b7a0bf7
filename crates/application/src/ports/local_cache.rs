//! Local cache port definition
//!
//! A small string-keyed store with browser-local-storage semantics: each
//! slot holds one serialized value, read and written wholesale. Backed by
//! per-slot JSON files in the user's data directory.

use async_trait::async_trait;

use crate::error::ApplicationError;

/// Port for the per-user local cache
#[async_trait]
pub trait LocalCachePort: Send + Sync + std::fmt::Debug {
    /// Read a slot's raw contents
    ///
    /// Returns `None` if the slot has never been written.
    async fn read(&self, slot: &str) -> Result<Option<String>, ApplicationError>;

    /// Overwrite a slot's contents
    async fn write(&self, slot: &str, value: &str) -> Result<(), ApplicationError>;

    /// Delete a slot
    async fn remove(&self, slot: &str) -> Result<(), ApplicationError>;
}

/// Well-known slot names
pub mod slots {
    /// Chat transcript, newest message last
    pub const CHAT_HISTORY: &str = "chatHistory";

    /// Saved meal plans, oldest first
    pub const SAVED_MEAL_PLANS: &str = "savedMealPlans";

    /// Nutrition analysis history, newest first
    pub const NUTRITION_HISTORY: &str = "nutritionAnalysisHistory";

    /// Recipe generation history, newest first
    pub const GENERATION_HISTORY: &str = "recipeGenerationHistory";

    /// Display theme preference
    pub const THEME: &str = "theme";
}
