//! Recipe generator service
//!
//! Drives the AI recipe generator: validates requests, keeps a short
//! generation history (newest first, capped at [`MAX_GENERATION_HISTORY`]),
//! and saves the most recent structured recipe to favorites on request.

use std::fmt;
use std::sync::Arc;

use domain::{GeneratedRecipe, GenerationRecord, RecipeRequest};
use parking_lot::Mutex;
use tracing::{debug, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{LocalCachePort, RecipeApiPort, RecipeGeneration, slots};

/// Maximum number of generations retained in local history
pub const MAX_GENERATION_HISTORY: usize = 10;

/// Service for AI recipe generation with local history
pub struct RecipeGeneratorService {
    api: Arc<dyn RecipeApiPort>,
    cache: Arc<dyn LocalCachePort>,
    last_recipe: Mutex<Option<GeneratedRecipe>>,
}

impl fmt::Debug for RecipeGeneratorService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecipeGeneratorService")
            .field("has_last_recipe", &self.last_recipe.lock().is_some())
            .finish_non_exhaustive()
    }
}

impl RecipeGeneratorService {
    /// Create a new recipe generator service
    pub fn new(api: Arc<dyn RecipeApiPort>, cache: Arc<dyn LocalCachePort>) -> Self {
        Self {
            api,
            cache,
            last_recipe: Mutex::new(None),
        }
    }

    /// Generate a recipe and record it in history
    ///
    /// The structured recipe, when the backend provides one, is kept for a
    /// later [`save_last_recipe`](Self::save_last_recipe) call.
    #[instrument(skip(self, request), fields(ingredients = request.ingredients.len()))]
    pub async fn generate(
        &self,
        request: &RecipeRequest,
    ) -> Result<RecipeGeneration, ApplicationError> {
        request.validate()?;

        let generation = self.api.generate_recipe(request).await?;
        *self.last_recipe.lock() = generation.recipe.clone();

        let record = GenerationRecord::new(request, &generation.rendered);
        let mut history = self.load_history().await;
        history.insert(0, record);
        history.truncate(MAX_GENERATION_HISTORY);
        if let Err(e) = self.store_history(&history).await {
            warn!(error = %e, "Failed to persist generation history");
        }
        debug!(entries = history.len(), "Recipe generation recorded");

        Ok(generation)
    }

    /// Save the most recently generated recipe to favorites
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Internal` if nothing has been generated
    /// yet or the last generation carried no structured recipe.
    #[instrument(skip(self))]
    pub async fn save_last_recipe(&self) -> Result<GeneratedRecipe, ApplicationError> {
        let recipe = self.last_recipe.lock().clone().ok_or_else(|| {
            ApplicationError::Internal("No generated recipe to save".to_string())
        })?;

        self.api.save_recipe(&recipe).await?;
        Ok(recipe)
    }

    /// Generation history, newest first
    pub async fn history(&self) -> Vec<GenerationRecord> {
        self.load_history().await
    }

    /// Drop the generation history
    pub async fn clear_history(&self) -> Result<(), ApplicationError> {
        self.cache.remove(slots::GENERATION_HISTORY).await
    }

    /// The user's saved favorite recipes
    pub async fn favorites(&self) -> Result<Vec<GeneratedRecipe>, ApplicationError> {
        self.api.favorites().await
    }

    async fn load_history(&self) -> Vec<GenerationRecord> {
        match self.cache.read(slots::GENERATION_HISTORY).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Discarding corrupt generation history");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read generation history");
                Vec::new()
            },
        }
    }

    async fn store_history(&self, history: &[GenerationRecord]) -> Result<(), ApplicationError> {
        let json = serde_json::to_string(history).map_err(|e| {
            ApplicationError::Internal(format!("History serialization error: {e}"))
        })?;
        self.cache.write(slots::GENERATION_HISTORY, &json).await
    }
}
