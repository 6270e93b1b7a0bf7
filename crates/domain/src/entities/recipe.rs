//! Recipe generation entities

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Parameters for the AI recipe generator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRequest {
    /// Available ingredients (at least one required)
    pub ingredients: Vec<String>,
    /// Desired cuisine (e.g. "Italian"), free-form
    pub cuisine: String,
    /// Meal type (e.g. "Dinner"), free-form
    pub meal_type: String,
    /// Dietary restrictions (e.g. "gluten-free"), free-form
    pub dietary_restrictions: String,
}

impl RecipeRequest {
    /// Create a request from an ingredient list
    #[must_use]
    pub fn new(ingredients: Vec<String>) -> Self {
        Self {
            ingredients,
            ..Self::default()
        }
    }

    /// Ingredients joined for form submission
    #[must_use]
    pub fn joined_ingredients(&self) -> String {
        self.ingredients.join(", ")
    }

    /// Validate that at least one ingredient was supplied
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.ingredients.iter().all(|i| i.trim().is_empty()) {
            return Err(DomainError::EmptyIngredients);
        }
        Ok(())
    }
}

/// A generated recipe, shaped for the save endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedRecipe {
    /// Recipe title
    pub title: String,
    /// Ingredient lines
    pub ingredients: Vec<String>,
    /// Instruction steps
    pub instructions: Vec<String>,
    /// Cooking time in minutes
    pub cooking_time: u32,
    /// Difficulty label (e.g. "Medium")
    pub difficulty: String,
    /// Recipe category (e.g. "Main Course")
    pub category: String,
    /// Nutrition facts by label (e.g. "calories" -> 420.0)
    #[serde(default)]
    pub nutritional_info: BTreeMap<String, f64>,
}

/// One completed recipe generation, kept in local history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Ingredients the recipe was generated from
    pub ingredients: Vec<String>,
    /// Requested cuisine
    pub cuisine: String,
    /// Requested meal type
    pub meal_type: String,
    /// Requested dietary restrictions
    pub dietary_restrictions: String,
    /// Rendered recipe as returned by the backend
    pub recipe: String,
    /// When the generation ran
    pub generated_at: DateTime<Utc>,
}

impl GenerationRecord {
    /// Create a record from the request and the rendered result
    pub fn new(request: &RecipeRequest, recipe: impl Into<String>) -> Self {
        Self {
            ingredients: request.ingredients.clone(),
            cuisine: request.cuisine.clone(),
            meal_type: request.meal_type.clone(),
            dietary_restrictions: request.dietary_restrictions.clone(),
            recipe: recipe.into(),
            generated_at: Utc::now(),
        }
    }
}
