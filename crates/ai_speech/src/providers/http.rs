//! HTTP-backed speech provider
//!
//! Talks to local STT/TTS services over HTTP:
//! - `POST {stt_url}/transcribe` with raw WAV bytes, returns `{ "text": .. }`
//! - `POST {tts_url}/synthesize` with `{ "text", "voice" }`, returns WAV bytes
//! - `GET {tts_url}/voices` returns `[ { "id", "name", "language" } ]`
//!
//! Works with whisper.cpp / piper HTTP wrappers and compatible services.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::SpeechConfig;
use crate::error::SpeechError;
use crate::ports::{SpeechToText, TextToSpeech};
use crate::types::{Transcription, VoiceInfo};

/// Speech provider backed by HTTP STT/TTS services
#[derive(Debug, Clone)]
pub struct HttpSpeechProvider {
    client: reqwest::Client,
    config: SpeechConfig,
}

#[derive(Debug, Serialize)]
struct SynthesizeRequest<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    voice: Option<&'a str>,
}

impl HttpSpeechProvider {
    /// Create a new provider
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Configuration` if the configuration is invalid.
    pub fn new(config: SpeechConfig) -> Result<Self, SpeechError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| SpeechError::Configuration(e.to_string()))?;

        Ok(Self { client, config })
    }

    async fn health_check(&self, base_url: &str) -> bool {
        let url = format!("{base_url}/health");
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(url = %url, error = %e, "Speech service health check failed");
                false
            },
        }
    }
}

#[async_trait]
impl SpeechToText for HttpSpeechProvider {
    #[instrument(skip(self, audio), fields(audio_size = audio.len()))]
    async fn transcribe(&self, audio: &[u8]) -> Result<Transcription, SpeechError> {
        let url = format!("{}/transcribe", self.config.stt_url);

        let response = self
            .client
            .post(&url)
            .header("content-type", "audio/wav")
            .body(audio.to_vec())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SpeechError::Recognition(format!(
                "STT service returned {}",
                response.status()
            )));
        }

        let transcription: Transcription = response
            .json()
            .await
            .map_err(|e| SpeechError::Recognition(format!("Invalid STT response: {e}")))?;

        debug!(
            text_len = transcription.text.len(),
            language = ?transcription.language,
            "Transcription received"
        );

        Ok(transcription)
    }

    async fn is_available(&self) -> bool {
        self.health_check(&self.config.stt_url).await
    }
}

#[async_trait]
impl TextToSpeech for HttpSpeechProvider {
    #[instrument(skip(self, text), fields(text_len = text.len(), voice = ?voice))]
    async fn synthesize(&self, text: &str, voice: Option<&str>) -> Result<Vec<u8>, SpeechError> {
        let url = format!("{}/synthesize", self.config.tts_url);

        let response = self
            .client
            .post(&url)
            .json(&SynthesizeRequest { text, voice })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SpeechError::Synthesis(format!(
                "TTS service returned {}",
                response.status()
            )));
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(SpeechError::Synthesis(
                "TTS service produced empty audio".to_string(),
            ));
        }

        Ok(audio.to_vec())
    }

    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, SpeechError> {
        let url = format!("{}/voices", self.config.tts_url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(SpeechError::Synthesis(format!(
                "Voice listing returned {}",
                response.status()
            )));
        }

        let voices: Vec<VoiceInfo> = response
            .json()
            .await
            .map_err(|e| SpeechError::Synthesis(format!("Invalid voices response: {e}")))?;

        Ok(voices)
    }

    async fn is_available(&self) -> bool {
        self.health_check(&self.config.tts_url).await
    }
}
