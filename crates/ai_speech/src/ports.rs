//! Port definitions for speech processing
//!
//! Defines the traits (ports) that speech adapters must implement.

use async_trait::async_trait;

use crate::error::SpeechError;
use crate::types::{Transcription, VoiceInfo};

/// Port for Speech-to-Text (STT) implementations
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe WAV audio to text
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if transcription fails.
    async fn transcribe(&self, audio: &[u8]) -> Result<Transcription, SpeechError>;

    /// Check if the STT service is available
    async fn is_available(&self) -> bool;
}

/// Port for Text-to-Speech (TTS) implementations
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Synthesize WAV audio from text
    ///
    /// # Arguments
    ///
    /// * `text` - Text to synthesize
    /// * `voice` - Optional voice id (service default if `None`)
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if synthesis fails.
    async fn synthesize(&self, text: &str, voice: Option<&str>) -> Result<Vec<u8>, SpeechError>;

    /// List available voices
    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, SpeechError>;

    /// Check if the TTS service is available
    async fn is_available(&self) -> bool;
}

/// Result of one capture session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Captured WAV audio
    Clip(Vec<u8>),
    /// Capture was stopped before completing
    Cancelled,
}

/// Port for microphone capture
///
/// `record` runs one capture session to completion; `stop` requests an early
/// end and must leave the source idle deterministically.
#[async_trait]
pub trait AudioSource: Send + Sync {
    /// Capture one audio clip
    async fn record(&self) -> Result<RecordOutcome, SpeechError>;

    /// Request the active capture session to stop
    fn stop(&self);
}

/// Result of one playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Playback ran to completion
    Finished,
    /// Playback was stopped before completing
    Cancelled,
}

/// Port for audio playback
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Play a WAV clip to completion or cancellation
    async fn play(&self, audio: &[u8]) -> Result<PlayOutcome, SpeechError>;

    /// Request the active playback session to stop
    fn stop(&self);
}
