//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The recipe backend rejected or failed a request
    #[error("Backend error: {0}")]
    Backend(String),

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Speech subsystem error
    #[error("Speech error: {0}")]
    Speech(String),

    /// Local cache read or write failed
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApplicationError::Backend(_) | ApplicationError::ExternalService(_)
        )
    }
}
