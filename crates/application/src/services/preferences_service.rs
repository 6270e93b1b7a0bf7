//! Preferences service
//!
//! Persists the display theme in the local cache. An unreadable or
//! unknown stored value falls back to the default theme.

use std::fmt;
use std::sync::Arc;

use domain::Theme;
use tracing::{instrument, warn};

use crate::error::ApplicationError;
use crate::ports::{LocalCachePort, slots};

/// Service for user preferences
pub struct PreferencesService {
    cache: Arc<dyn LocalCachePort>,
}

impl fmt::Debug for PreferencesService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreferencesService").finish_non_exhaustive()
    }
}

impl PreferencesService {
    /// Create a new preferences service
    pub fn new(cache: Arc<dyn LocalCachePort>) -> Self {
        Self { cache }
    }

    /// Current theme, defaulting to light
    pub async fn theme(&self) -> Theme {
        match self.cache.read(slots::THEME).await {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
                warn!(error = %e, "Ignoring unknown stored theme");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read theme preference");
                Theme::default()
            },
        }
    }

    /// Set and persist the theme
    #[instrument(skip(self))]
    pub async fn set_theme(&self, theme: Theme) -> Result<(), ApplicationError> {
        self.cache.write(slots::THEME, &theme.to_string()).await
    }

    /// Flip between light and dark, returning the new theme
    pub async fn toggle_theme(&self) -> Result<Theme, ApplicationError> {
        let next = self.theme().await.toggled();
        self.set_theme(next).await?;
        Ok(next)
    }
}
