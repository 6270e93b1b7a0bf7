//! Speech configuration

use serde::{Deserialize, Serialize};

use crate::error::SpeechError;

/// Configuration for the speech subsystem
///
/// Absent configuration means the speech capability is unsupported for the
/// session; callers should degrade to text-only operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Base URL of the speech-to-text service
    pub stt_url: String,
    /// Base URL of the text-to-speech service
    pub tts_url: String,
    /// Preferred voice language prefix for synthesis
    #[serde(default = "default_preferred_language")]
    pub preferred_language: String,
    /// Explicit voice id override (skips voice selection)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Microphone capture command
    #[serde(default)]
    pub recorder: RecorderConfig,
    /// Audio playback command
    #[serde(default)]
    pub player: PlayerConfig,
}

/// Command used to capture microphone audio into a WAV file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Executable name or path
    #[serde(default = "default_recorder_command")]
    pub command: String,
    /// Extra arguments placed before the output path
    #[serde(default)]
    pub args: Vec<String>,
    /// Hard cap on one capture session, in seconds
    #[serde(default = "default_max_seconds")]
    pub max_seconds: u64,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            command: default_recorder_command(),
            args: Vec::new(),
            max_seconds: default_max_seconds(),
        }
    }
}

/// Command used to play a WAV file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Executable name or path
    #[serde(default = "default_player_command")]
    pub command: String,
    /// Extra arguments placed before the input path
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            command: default_player_command(),
            args: Vec::new(),
        }
    }
}

fn default_preferred_language() -> String {
    "en".to_string()
}

const fn default_timeout_ms() -> u64 {
    30_000
}

fn default_recorder_command() -> String {
    "arecord".to_string()
}

const fn default_max_seconds() -> u64 {
    30
}

fn default_player_command() -> String {
    "aplay".to_string()
}

impl SpeechConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), SpeechError> {
        if self.stt_url.trim().is_empty() {
            return Err(SpeechError::Configuration("stt_url is empty".to_string()));
        }
        if self.tts_url.trim().is_empty() {
            return Err(SpeechError::Configuration("tts_url is empty".to_string()));
        }
        if self.timeout_ms == 0 {
            return Err(SpeechError::Configuration(
                "timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
