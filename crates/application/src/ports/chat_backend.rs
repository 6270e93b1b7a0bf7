//! Chat backend port definition

use async_trait::async_trait;

use crate::error::ApplicationError;

/// Port for the conversational recipe assistant backend
#[async_trait]
pub trait ChatBackendPort: Send + Sync {
    /// Send one user message and return the assistant's reply text
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError` if the backend is unreachable or rejects
    /// the request.
    async fn ask(&self, message: &str) -> Result<String, ApplicationError>;

    /// Check if the backend is reachable
    async fn is_healthy(&self) -> bool;
}
