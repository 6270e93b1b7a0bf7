//! Application services

mod chat_session;
mod meal_planner_service;
mod nutrition_service;
mod preferences_service;
mod recipe_generator_service;
mod transcript_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use chat_session::{ChatSession, SendOutcome, SessionEvent, SessionPhase};
pub use meal_planner_service::MealPlannerService;
pub use nutrition_service::{MAX_NUTRITION_HISTORY, NutritionService};
pub use preferences_service::PreferencesService;
pub use recipe_generator_service::{MAX_GENERATION_HISTORY, RecipeGeneratorService};
pub use transcript_service::TranscriptService;
