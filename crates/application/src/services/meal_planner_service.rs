//! Meal planner service
//!
//! Requests plans from the backend and manages the locally saved plan
//! collection. Saved plans are uncapped and kept oldest-first; the
//! collection lives wholesale in one cache slot.

use std::fmt;
use std::sync::Arc;

use domain::{MealPlanRequest, SavedMealPlan};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::error::ApplicationError;
use crate::ports::{LocalCachePort, RecipeApiPort, slots};

/// Service for meal planning and the saved plan collection
pub struct MealPlannerService {
    api: Arc<dyn RecipeApiPort>,
    cache: Arc<dyn LocalCachePort>,
}

impl fmt::Debug for MealPlannerService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MealPlannerService").finish_non_exhaustive()
    }
}

impl MealPlannerService {
    /// Create a new meal planner service
    pub fn new(api: Arc<dyn RecipeApiPort>, cache: Arc<dyn LocalCachePort>) -> Self {
        Self { api, cache }
    }

    /// Request a meal plan from the backend
    #[instrument(skip(self), fields(days = request.days))]
    pub async fn plan(&self, request: &MealPlanRequest) -> Result<String, ApplicationError> {
        request.validate()?;
        self.api.meal_plan(request).await
    }

    /// Save a plan under a user-chosen name
    #[instrument(skip(self, content), fields(name = %name))]
    pub async fn save_plan(
        &self,
        name: &str,
        content: &str,
    ) -> Result<SavedMealPlan, ApplicationError> {
        let mut plans = self.load_plans().await;
        let plan = SavedMealPlan::new(name, content);
        plans.push(plan.clone());
        self.store_plans(&plans).await?;
        debug!(total = plans.len(), "Meal plan saved");
        Ok(plan)
    }

    /// List saved plans, oldest first
    pub async fn saved_plans(&self) -> Vec<SavedMealPlan> {
        self.load_plans().await
    }

    /// Delete a saved plan by id
    ///
    /// Returns `false` if no plan with that id exists.
    #[instrument(skip(self))]
    pub async fn delete_plan(&self, id: Uuid) -> Result<bool, ApplicationError> {
        let mut plans = self.load_plans().await;
        let before = plans.len();
        plans.retain(|p| p.id != id);
        if plans.len() == before {
            return Ok(false);
        }
        self.store_plans(&plans).await?;
        Ok(true)
    }

    /// Derive a deduplicated, sorted grocery list from rendered plan text
    ///
    /// Bullet lines ("- item" or "* item") are taken as items; matching is
    /// case-insensitive, keeping the first spelling seen.
    #[must_use]
    pub fn grocery_list(content: &str) -> Vec<String> {
        let mut items: Vec<String> = Vec::new();
        for line in content.lines() {
            let trimmed = line.trim();
            let Some(item) = trimmed
                .strip_prefix("- ")
                .or_else(|| trimmed.strip_prefix("* "))
            else {
                continue;
            };
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            if !items.iter().any(|seen| seen.eq_ignore_ascii_case(item)) {
                items.push(item.to_string());
            }
        }
        items.sort_by_key(|item| item.to_lowercase());
        items
    }

    async fn load_plans(&self) -> Vec<SavedMealPlan> {
        match self.cache.read(slots::SAVED_MEAL_PLANS).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Discarding corrupt saved plans");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read saved plans");
                Vec::new()
            },
        }
    }

    async fn store_plans(&self, plans: &[SavedMealPlan]) -> Result<(), ApplicationError> {
        let json = serde_json::to_string(plans)
            .map_err(|e| ApplicationError::Internal(format!("Plan serialization error: {e}")))?;
        self.cache.write(slots::SAVED_MEAL_PLANS, &json).await
    }
}

#[cfg(test)]
mod tests {
    use domain::{DomainError, GeneratedRecipe, RecipeRequest};
    use mockall::mock;

    use super::*;
    use crate::ports::RecipeGeneration;
    use crate::services::test_support::InMemoryCache;

    mock! {
        pub Api {}

        #[async_trait::async_trait]
        impl RecipeApiPort for Api {
            async fn meal_plan(&self, request: &MealPlanRequest) -> Result<String, ApplicationError>;
            async fn nutrition(&self, ingredients: &str) -> Result<String, ApplicationError>;
            async fn generate_recipe(&self, request: &RecipeRequest) -> Result<RecipeGeneration, ApplicationError>;
            async fn save_recipe(&self, recipe: &GeneratedRecipe) -> Result<(), ApplicationError>;
            async fn favorites(&self) -> Result<Vec<GeneratedRecipe>, ApplicationError>;
        }
    }

    fn service(cache: Arc<InMemoryCache>) -> MealPlannerService {
        let mut api = MockApi::new();
        api.expect_meal_plan()
            .returning(|_| Ok("Mon: oats\nTue: soup".to_string()));
        MealPlannerService::new(Arc::new(api), cache)
    }

    #[tokio::test]
    async fn plan_validates_before_calling_backend() {
        let service = service(Arc::new(InMemoryCache::new()));
        let result = service.plan(&MealPlanRequest::new(0)).await;
        assert!(matches!(
            result,
            Err(ApplicationError::Domain(DomainError::InvalidPlanLength { days: 0 }))
        ));
    }

    #[tokio::test]
    async fn plan_returns_backend_rendering() {
        let service = service(Arc::new(InMemoryCache::new()));
        let plan = service.plan(&MealPlanRequest::new(7)).await.unwrap();
        assert!(plan.contains("Mon: oats"));
    }

    #[tokio::test]
    async fn saved_plans_accumulate_oldest_first() {
        let service = service(Arc::new(InMemoryCache::new()));

        service.save_plan("Week 1", "plan a").await.unwrap();
        service.save_plan("Week 2", "plan b").await.unwrap();

        let plans = service.saved_plans().await;
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].name, "Week 1");
        assert_eq!(plans[1].name, "Week 2");
    }

    #[tokio::test]
    async fn saved_plans_survive_reload() {
        let cache = Arc::new(InMemoryCache::new());
        service(Arc::clone(&cache))
            .save_plan("Keeper", "plan")
            .await
            .unwrap();

        let plans = service(cache).saved_plans().await;
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].name, "Keeper");
    }

    #[tokio::test]
    async fn delete_removes_only_the_named_plan() {
        let service = service(Arc::new(InMemoryCache::new()));
        let keep = service.save_plan("Keep", "a").await.unwrap();
        let doomed = service.save_plan("Drop", "b").await.unwrap();

        assert!(service.delete_plan(doomed.id).await.unwrap());

        let plans = service.saved_plans().await;
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].id, keep.id);
    }

    #[tokio::test]
    async fn delete_of_unknown_id_reports_false() {
        let service = service(Arc::new(InMemoryCache::new()));
        assert!(!service.delete_plan(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn corrupt_saved_plans_start_over() {
        let cache = Arc::new(InMemoryCache::with_slot(slots::SAVED_MEAL_PLANS, "oops"));
        let plans = service(cache).saved_plans().await;
        assert!(plans.is_empty());
    }

    #[test]
    fn grocery_list_dedupes_case_insensitively() {
        let content = "Monday\n- Eggs\n- milk\nTuesday\n* eggs\n- Bread";
        let list = MealPlannerService::grocery_list(content);
        assert_eq!(list, vec!["Bread", "Eggs", "milk"]);
    }

    #[test]
    fn grocery_list_ignores_non_bullet_lines() {
        let list = MealPlannerService::grocery_list("No bullets here\njust prose");
        assert!(list.is_empty());
    }
}
