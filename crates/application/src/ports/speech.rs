//! Speech port definitions
//!
//! The session controller sees speech through these two ports. An
//! environment without speech services provides no implementations; the
//! controller then runs text-only.

use async_trait::async_trait;

use crate::error::ApplicationError;

/// Result of one speech input session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechInputOutcome {
    /// The user's utterance, transcribed
    Transcript(String),
    /// Input was cancelled before a transcript arrived
    Cancelled,
    /// A session was already active; the request was ignored
    AlreadyListening,
}

/// Port for speech input (microphone plus transcription)
#[async_trait]
pub trait SpeechInputPort: Send + Sync {
    /// Run one listen session to completion or cancellation
    async fn listen(&self) -> Result<SpeechInputOutcome, ApplicationError>;

    /// Cancel the active session, if any
    fn cancel(&self);

    /// Whether a session is currently active
    fn is_listening(&self) -> bool;
}

/// Port for speech output (synthesis plus playback)
#[async_trait]
pub trait SpeechOutputPort: Send + Sync {
    /// Speak the given text, superseding any utterance in flight
    async fn speak(&self, text: &str) -> Result<(), ApplicationError>;

    /// Stop the current utterance, if any
    fn stop(&self);

    /// Whether an utterance is currently playing
    fn is_speaking(&self) -> bool;
}
