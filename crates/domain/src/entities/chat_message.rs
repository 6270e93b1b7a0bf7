//! Chat message entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a message in the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Message typed or spoken by the user
    User,
    /// Message returned by the assistant backend
    Bot,
}

/// A single message in the chat transcript
///
/// Immutable once created; the transcript owns messages by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who sent the message
    pub sender: Sender,
    /// Message text as sent or received
    pub text: String,
    /// When the message was created
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a new user message
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new bot message
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}
