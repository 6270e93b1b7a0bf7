//! Speech output session
//!
//! Composes a `TextToSpeech` provider and an `AudioPlayer` into a single
//! speak operation with last-call-wins semantics: starting a new utterance
//! supersedes any in-flight one, and `stop` silences playback immediately.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tracing::{debug, instrument, warn};

use crate::error::SpeechError;
use crate::ports::{AudioPlayer, TextToSpeech};

/// Speech output adapter with last-call-wins semantics
pub struct Speaker {
    tts: Arc<dyn TextToSpeech>,
    player: Arc<dyn AudioPlayer>,
    preferred_language: String,
    voice_override: Option<String>,
    speaking: AtomicBool,
    generation: AtomicU64,
}

impl fmt::Debug for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Speaker")
            .field("preferred_language", &self.preferred_language)
            .field("voice_override", &self.voice_override)
            .field("speaking", &self.speaking)
            .finish_non_exhaustive()
    }
}

impl Speaker {
    /// Create a new speaker preferring voices of the given language
    pub fn new(
        tts: Arc<dyn TextToSpeech>,
        player: Arc<dyn AudioPlayer>,
        preferred_language: impl Into<String>,
    ) -> Self {
        Self {
            tts,
            player,
            preferred_language: preferred_language.into(),
            voice_override: None,
            speaking: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        }
    }

    /// Pin a specific voice instead of selecting by language
    #[must_use]
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice_override = Some(voice.into());
        self
    }

    /// Speak the given text aloud
    ///
    /// Any utterance already in flight is stopped first. If another call to
    /// `speak` arrives while this one is still synthesizing, this one yields
    /// without playing. Speaking empty text, or having no voices available,
    /// is a silent no-op.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.player.stop();

        if text.trim().is_empty() {
            return Ok(());
        }

        let voice = match &self.voice_override {
            Some(voice) => Some(voice.clone()),
            None => match self.select_voice().await? {
                Some(voice) => Some(voice),
                None => {
                    warn!("No voices available; skipping speech");
                    return Ok(());
                },
            },
        };

        let audio = self.tts.synthesize(text, voice.as_deref()).await?;

        if self.generation.load(Ordering::SeqCst) != my_generation {
            debug!("Utterance superseded before playback");
            return Ok(());
        }

        self.speaking.store(true, Ordering::SeqCst);
        let result = self.player.play(&audio).await;
        if self.generation.load(Ordering::SeqCst) == my_generation {
            self.speaking.store(false, Ordering::SeqCst);
        }
        result.map(|_| ())
    }

    /// Pick a voice matching the preferred language, falling back to the
    /// first voice on offer
    async fn select_voice(&self) -> Result<Option<String>, SpeechError> {
        let voices = self.tts.list_voices().await?;
        let Some(first) = voices.first() else {
            return Ok(None);
        };

        let chosen = voices
            .iter()
            .find(|v| v.language.starts_with(&self.preferred_language))
            .unwrap_or(first);

        debug!(voice = %chosen.id, language = %chosen.language, "Voice selected");
        Ok(Some(chosen.id.clone()))
    }

    /// Stop the current utterance, if any
    pub fn stop(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.player.stop();
        self.speaking.store(false, Ordering::SeqCst);
    }

    /// Whether an utterance is currently playing
    pub fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::SeqCst)
    }
}
