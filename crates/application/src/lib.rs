//! Application layer - Use cases and session orchestration
//!
//! Contains the chat session controller, history-backed services, message
//! formatting, and the port definitions the infrastructure adapters
//! implement.

pub mod error;
pub mod formatting;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use formatting::{clean_for_speech, format_message};
pub use ports::*;
pub use services::*;
