//! Recipe backend client
//!
//! HTTP adapter for the recipe backend, implementing both the chat port
//! and the planning/generation port. Wire formats:
//! - `POST /chatbot` with `{ "message" }`, returns `{ "response" }`
//! - `POST /meal_planner` (form), returns `{ "response" }`
//! - `POST /nutrition_helper` (form), returns `{ "response" }`
//! - `POST /ai_recipe_generator` (form), returns `{ "response", "recipe"? }`
//! - `POST /save_generated_recipe` with `{ "recipe" }`, returns `{ "status" }`
//! - `GET /favorites`, returns `{ "recipes": [..] }`

use std::time::Duration;

use application::error::ApplicationError;
use application::ports::{ChatBackendPort, RecipeApiPort, RecipeGeneration};
use async_trait::async_trait;
use domain::{GeneratedRecipe, MealPlanRequest, RecipeRequest};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::BackendConfig;

/// HTTP client for the recipe backend
#[derive(Debug, Clone)]
pub struct RecipeBackendClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct MealPlanForm<'a> {
    days: u16,
    start_date: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    diet: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    calories: Option<u32>,
}

#[derive(Debug, Serialize)]
struct NutritionForm<'a> {
    ingredients: &'a str,
}

#[derive(Debug, Serialize)]
struct GeneratorForm<'a> {
    ingredients: String,
    cuisine: &'a str,
    meal_type: &'a str,
    dietary_restrictions: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeneratorResponse {
    response: String,
    #[serde(default)]
    recipe: Option<GeneratedRecipe>,
}

#[derive(Debug, Serialize)]
struct SaveRecipeRequest<'a> {
    recipe: &'a GeneratedRecipe,
}

#[derive(Debug, Deserialize)]
struct SaveRecipeResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FavoritesResponse {
    #[serde(default)]
    recipes: Vec<GeneratedRecipe>,
}

impl RecipeBackendClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the HTTP client cannot
    /// be built.
    pub fn new(config: &BackendConfig) -> Result<Self, ApplicationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn map_transport(err: reqwest::Error) -> ApplicationError {
        if err.is_timeout() || err.is_connect() {
            ApplicationError::ExternalService(err.to_string())
        } else {
            ApplicationError::Backend(err.to_string())
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApplicationError> {
        if !response.status().is_success() {
            return Err(ApplicationError::Backend(format!(
                "Backend returned {}",
                response.status()
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl ChatBackendPort for RecipeBackendClient {
    #[instrument(skip(self, message), fields(message_len = message.len()))]
    async fn ask(&self, message: &str) -> Result<String, ApplicationError> {
        let response = self
            .client
            .post(self.url("/chatbot"))
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(Self::map_transport)?;

        let body: ChatResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ApplicationError::Backend(format!("Invalid chat response: {e}")))?;

        debug!(reply_len = body.response.len(), "Chat reply received");
        Ok(body.response)
    }

    async fn is_healthy(&self) -> bool {
        match self.client.get(self.url("/health")).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl RecipeApiPort for RecipeBackendClient {
    #[instrument(skip(self, request), fields(days = request.days))]
    async fn meal_plan(&self, request: &MealPlanRequest) -> Result<String, ApplicationError> {
        let start_date = request.start_date.format("%Y-%m-%d").to_string();
        let form = MealPlanForm {
            days: request.days,
            start_date: &start_date,
            diet: request.diet.as_deref(),
            calories: request.calories,
        };

        let response = self
            .client
            .post(self.url("/meal_planner"))
            .form(&form)
            .send()
            .await
            .map_err(Self::map_transport)?;

        let body: ChatResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ApplicationError::Backend(format!("Invalid plan response: {e}")))?;

        Ok(body.response)
    }

    #[instrument(skip(self, ingredients))]
    async fn nutrition(&self, ingredients: &str) -> Result<String, ApplicationError> {
        let response = self
            .client
            .post(self.url("/nutrition_helper"))
            .form(&NutritionForm { ingredients })
            .send()
            .await
            .map_err(Self::map_transport)?;

        let body: ChatResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ApplicationError::Backend(format!("Invalid analysis response: {e}")))?;

        Ok(body.response)
    }

    #[instrument(skip(self, request), fields(ingredients = request.ingredients.len()))]
    async fn generate_recipe(
        &self,
        request: &RecipeRequest,
    ) -> Result<RecipeGeneration, ApplicationError> {
        let form = GeneratorForm {
            ingredients: request.joined_ingredients(),
            cuisine: &request.cuisine,
            meal_type: &request.meal_type,
            dietary_restrictions: &request.dietary_restrictions,
        };

        let response = self
            .client
            .post(self.url("/ai_recipe_generator"))
            .form(&form)
            .send()
            .await
            .map_err(Self::map_transport)?;

        let body: GeneratorResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ApplicationError::Backend(format!("Invalid generator response: {e}")))?;

        Ok(RecipeGeneration {
            rendered: body.response,
            recipe: body.recipe,
        })
    }

    #[instrument(skip(self, recipe), fields(title = %recipe.title))]
    async fn save_recipe(&self, recipe: &GeneratedRecipe) -> Result<(), ApplicationError> {
        let response = self
            .client
            .post(self.url("/save_generated_recipe"))
            .json(&SaveRecipeRequest { recipe })
            .send()
            .await
            .map_err(Self::map_transport)?;

        let body: SaveRecipeResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ApplicationError::Backend(format!("Invalid save response: {e}")))?;

        if body.status != "success" {
            return Err(ApplicationError::Backend(
                body.message
                    .unwrap_or_else(|| format!("Save rejected with status {}", body.status)),
            ));
        }

        Ok(())
    }

    async fn favorites(&self) -> Result<Vec<GeneratedRecipe>, ApplicationError> {
        let response = self
            .client
            .get(self.url("/favorites"))
            .send()
            .await
            .map_err(Self::map_transport)?;

        let body: FavoritesResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ApplicationError::Backend(format!("Invalid favorites response: {e}")))?;

        Ok(body.recipes)
    }
}
