//! Nutrition analysis service
//!
//! Sends ingredient lists to the backend for analysis and keeps a short
//! local history, newest first, capped at [`MAX_NUTRITION_HISTORY`].

use std::fmt;
use std::sync::Arc;

use domain::{DomainError, NutritionRecord};
use tracing::{debug, instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{LocalCachePort, RecipeApiPort, slots};

/// Maximum number of analyses retained in local history
pub const MAX_NUTRITION_HISTORY: usize = 10;

/// Service for nutrition analysis with local history
pub struct NutritionService {
    api: Arc<dyn RecipeApiPort>,
    cache: Arc<dyn LocalCachePort>,
}

impl fmt::Debug for NutritionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NutritionService").finish_non_exhaustive()
    }
}

impl NutritionService {
    /// Create a new nutrition service
    pub fn new(api: Arc<dyn RecipeApiPort>, cache: Arc<dyn LocalCachePort>) -> Self {
        Self { api, cache }
    }

    /// Analyze an ingredient list and record the result in history
    ///
    /// Empty input is rejected before any network traffic.
    #[instrument(skip(self, ingredients))]
    pub async fn analyze(
        &self,
        ingredients: Vec<String>,
    ) -> Result<NutritionRecord, ApplicationError> {
        if ingredients.iter().all(|i| i.trim().is_empty()) {
            return Err(DomainError::EmptyIngredients.into());
        }

        let joined = ingredients.join(", ");
        let analysis = self.api.nutrition(&joined).await?;
        let record = NutritionRecord::new(ingredients, analysis);

        let mut history = self.load_history().await;
        history.insert(0, record.clone());
        history.truncate(MAX_NUTRITION_HISTORY);
        if let Err(e) = self.store_history(&history).await {
            warn!(error = %e, "Failed to persist nutrition history");
        }
        debug!(entries = history.len(), "Nutrition analysis recorded");

        Ok(record)
    }

    /// Analysis history, newest first
    pub async fn history(&self) -> Vec<NutritionRecord> {
        self.load_history().await
    }

    /// Drop the analysis history
    pub async fn clear_history(&self) -> Result<(), ApplicationError> {
        self.cache.remove(slots::NUTRITION_HISTORY).await
    }

    async fn load_history(&self) -> Vec<NutritionRecord> {
        match self.cache.read(slots::NUTRITION_HISTORY).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Discarding corrupt nutrition history");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read nutrition history");
                Vec::new()
            },
        }
    }

    async fn store_history(&self, history: &[NutritionRecord]) -> Result<(), ApplicationError> {
        let json = serde_json::to_string(history).map_err(|e| {
            ApplicationError::Internal(format!("History serialization error: {e}"))
        })?;
        self.cache.write(slots::NUTRITION_HISTORY, &json).await
    }
}
