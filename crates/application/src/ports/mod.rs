//! Port definitions for the application layer
//!
//! Traits the infrastructure adapters implement: the recipe backend,
//! browser-profile-style local cache, and the speech boundary.

mod chat_backend;
mod local_cache;
mod recipe_api;
mod speech;

pub use chat_backend::ChatBackendPort;
pub use local_cache::{LocalCachePort, slots};
pub use recipe_api::{RecipeApiPort, RecipeGeneration};
pub use speech::{SpeechInputOutcome, SpeechInputPort, SpeechOutputPort};
