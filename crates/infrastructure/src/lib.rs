//! Infrastructure layer - Adapters and technical services
//!
//! Implements the application ports:
//! - [`RecipeBackendClient`] - HTTP client for the recipe backend
//! - [`FileCache`] - per-slot JSON files with local-storage semantics
//! - [`SpeechInputAdapter`] / [`SpeechOutputAdapter`] - speech boundary
//!
//! Plus configuration loading and tracing setup.

pub mod adapters;
pub mod config;
pub mod http;
pub mod persistence;
pub mod telemetry;

pub use adapters::{SpeechInputAdapter, SpeechOutputAdapter, build_speech_adapters};
pub use config::{AppConfig, BackendConfig, LocalCacheConfig};
pub use http::RecipeBackendClient;
pub use persistence::FileCache;
pub use telemetry::init_tracing;
