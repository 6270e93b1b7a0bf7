//! Recipe backend port definition
//!
//! Covers the non-chat endpoints of the recipe backend: meal planning,
//! nutrition analysis, recipe generation, and the favorites collection.

use async_trait::async_trait;
use domain::{GeneratedRecipe, MealPlanRequest, RecipeRequest};

use crate::error::ApplicationError;

/// Result of one recipe generation
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeGeneration {
    /// Rendered recipe text for display
    pub rendered: String,
    /// Structured recipe, when the backend provides one; required for
    /// saving to favorites
    pub recipe: Option<GeneratedRecipe>,
}

/// Port for the recipe backend's planning and generation endpoints
#[async_trait]
pub trait RecipeApiPort: Send + Sync {
    /// Request a meal plan, returned as display text
    async fn meal_plan(&self, request: &MealPlanRequest) -> Result<String, ApplicationError>;

    /// Request a nutrition analysis for an ingredient list
    async fn nutrition(&self, ingredients: &str) -> Result<String, ApplicationError>;

    /// Generate a recipe from the given constraints
    async fn generate_recipe(
        &self,
        request: &RecipeRequest,
    ) -> Result<RecipeGeneration, ApplicationError>;

    /// Persist a generated recipe to the user's favorites
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Backend` if the backend reports anything
    /// other than success.
    async fn save_recipe(&self, recipe: &GeneratedRecipe) -> Result<(), ApplicationError>;

    /// List the user's favorite recipes
    async fn favorites(&self) -> Result<Vec<GeneratedRecipe>, ApplicationError>;
}
