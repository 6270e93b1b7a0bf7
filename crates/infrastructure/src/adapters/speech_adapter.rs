//! Speech adapters - Implement the speech ports using the ai_speech crate
//!
//! Bridges the application's speech ports onto [`Listener`] and
//! [`Speaker`], mapping speech errors into application errors. Built from
//! a [`SpeechConfig`]; absence of that config means the session has no
//! speech ports at all.

use std::sync::Arc;

use ai_speech::{
    CommandPlayer, CommandRecorder, HttpSpeechProvider, ListenOutcome, Listener, SpeechConfig,
    SpeechError, Speaker,
};
use application::error::ApplicationError;
use application::ports::{SpeechInputOutcome, SpeechInputPort, SpeechOutputPort};
use async_trait::async_trait;
use tracing::debug;

/// Adapter exposing a [`Listener`] as the speech input port
#[derive(Debug)]
pub struct SpeechInputAdapter {
    listener: Listener,
}

/// Adapter exposing a [`Speaker`] as the speech output port
#[derive(Debug)]
pub struct SpeechOutputAdapter {
    speaker: Speaker,
}

/// Build both speech adapters from one configuration
///
/// # Errors
///
/// Returns `ApplicationError::Configuration` if the configuration is
/// invalid.
pub fn build_speech_adapters(
    config: &SpeechConfig,
) -> Result<(Arc<SpeechInputAdapter>, Arc<SpeechOutputAdapter>), ApplicationError> {
    let provider = Arc::new(
        HttpSpeechProvider::new(config.clone())
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?,
    );

    let recorder = Arc::new(CommandRecorder::new(config.recorder.clone()));
    let player = Arc::new(CommandPlayer::new(config.player.clone()));

    let listener = Listener::new(recorder, Arc::clone(&provider) as _);
    let mut speaker = Speaker::new(provider, player, config.preferred_language.clone());
    if let Some(voice) = &config.voice {
        speaker = speaker.with_voice(voice.clone());
    }

    debug!("Speech adapters ready");
    Ok((
        Arc::new(SpeechInputAdapter { listener }),
        Arc::new(SpeechOutputAdapter { speaker }),
    ))
}

fn map_error(err: SpeechError) -> ApplicationError {
    match err {
        SpeechError::Configuration(e) => ApplicationError::Configuration(e),
        SpeechError::ConnectionFailed(e) | SpeechError::RequestFailed(e) => {
            ApplicationError::ExternalService(e)
        },
        SpeechError::Timeout(ms) => {
            ApplicationError::ExternalService(format!("Speech service timeout after {ms}ms"))
        },
        other => ApplicationError::Speech(other.to_string()),
    }
}

#[async_trait]
impl SpeechInputPort for SpeechInputAdapter {
    async fn listen(&self) -> Result<SpeechInputOutcome, ApplicationError> {
        match self.listener.listen().await.map_err(map_error)? {
            ListenOutcome::Transcript(transcription) => {
                Ok(SpeechInputOutcome::Transcript(transcription.text))
            },
            ListenOutcome::Cancelled => Ok(SpeechInputOutcome::Cancelled),
            ListenOutcome::AlreadyListening => Ok(SpeechInputOutcome::AlreadyListening),
        }
    }

    fn cancel(&self) {
        self.listener.cancel();
    }

    fn is_listening(&self) -> bool {
        self.listener.is_listening()
    }
}

#[async_trait]
impl SpeechOutputPort for SpeechOutputAdapter {
    async fn speak(&self, text: &str) -> Result<(), ApplicationError> {
        self.speaker.speak(text).await.map_err(map_error)
    }

    fn stop(&self) {
        self.speaker.stop();
    }

    fn is_speaking(&self) -> bool {
        self.speaker.is_speaking()
    }
}
