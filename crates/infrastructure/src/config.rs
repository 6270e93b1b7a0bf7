//! Application configuration
//!
//! Loaded from an optional `souschef.toml` in the working directory,
//! overridable with `SOUSCHEF_*` environment variables. Nesting uses a
//! double underscore (for example `SOUSCHEF_BACKEND__BASE_URL`), since
//! field names like `base_url` contain underscores themselves. Speech is
//! configured by presence: no `[speech]` section means the session runs
//! text-only.

use std::path::PathBuf;

use ai_speech::SpeechConfig;
use serde::{Deserialize, Serialize};

/// Recipe backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the recipe backend
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Local cache location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalCacheConfig {
    /// Cache directory; defaults to the platform data directory
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl LocalCacheConfig {
    /// Resolve the cache directory, falling back to the platform data dir
    #[must_use]
    pub fn resolve_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("souschef")
        })
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Recipe backend settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Speech services; absent means text-only
    #[serde(default)]
    pub speech: Option<SpeechConfig>,

    /// Local cache settings
    #[serde(default)]
    pub cache: LocalCacheConfig,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

const fn default_timeout_ms() -> u64 {
    30_000
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name("souschef").required(false))
            // Override with environment variables (e.g., SOUSCHEF_BACKEND__BASE_URL)
            .add_source(
                config::Environment::with_prefix("SOUSCHEF")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
