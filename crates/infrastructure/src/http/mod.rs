//! HTTP clients

mod recipe_client;

pub use recipe_client::RecipeBackendClient;
