//! Domain entities

mod chat_message;
mod meal_plan;
mod nutrition;
mod recipe;
mod transcript;

pub use chat_message::{ChatMessage, Sender};
pub use meal_plan::{MealPlanRequest, SavedMealPlan};
pub use nutrition::NutritionRecord;
pub use recipe::{GeneratedRecipe, GenerationRecord, RecipeRequest};
pub use transcript::{MAX_TRANSCRIPT_LEN, Transcript};
