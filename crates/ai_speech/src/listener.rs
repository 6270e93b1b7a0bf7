//! One-shot speech input session
//!
//! Composes an `AudioSource` and a `SpeechToText` provider into a single
//! listen operation: capture one clip, transcribe it, return to idle. At most
//! one session is active at a time; cancellation reaches idle
//! deterministically.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, instrument};

use crate::error::SpeechError;
use crate::ports::{AudioSource, RecordOutcome, SpeechToText};
use crate::types::Transcription;

/// Result of one listen session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenOutcome {
    /// A transcript was produced
    Transcript(Transcription),
    /// The session was cancelled before a result arrived
    Cancelled,
    /// Another session is already active; this call was a no-op
    AlreadyListening,
}

/// One-shot speech input adapter
pub struct Listener {
    source: Arc<dyn AudioSource>,
    stt: Arc<dyn SpeechToText>,
    listening: AtomicBool,
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("listening", &self.listening)
            .finish_non_exhaustive()
    }
}

impl Listener {
    /// Create a new listener
    pub fn new(source: Arc<dyn AudioSource>, stt: Arc<dyn SpeechToText>) -> Self {
        Self {
            source,
            stt,
            listening: AtomicBool::new(false),
        }
    }

    /// Run one listen session
    ///
    /// Captures a clip, transcribes it, and returns to idle. Calling while a
    /// session is active yields [`ListenOutcome::AlreadyListening`] without
    /// side effects. Every path, including errors and cancellation, leaves
    /// the listener idle.
    #[instrument(skip(self))]
    pub async fn listen(&self) -> Result<ListenOutcome, SpeechError> {
        if self.listening.swap(true, Ordering::SeqCst) {
            debug!("Listen requested while already listening; ignoring");
            return Ok(ListenOutcome::AlreadyListening);
        }

        let result = self.run_session().await;
        self.listening.store(false, Ordering::SeqCst);
        result
    }

    async fn run_session(&self) -> Result<ListenOutcome, SpeechError> {
        let clip = match self.source.record().await? {
            RecordOutcome::Clip(clip) => clip,
            RecordOutcome::Cancelled => return Ok(ListenOutcome::Cancelled),
        };

        let transcription = self.stt.transcribe(&clip).await?;
        if transcription.is_empty() {
            return Err(SpeechError::Recognition("No speech detected".to_string()));
        }

        debug!(text_len = transcription.text.len(), "Listen session complete");
        Ok(ListenOutcome::Transcript(transcription))
    }

    /// Cancel the active session, if any
    pub fn cancel(&self) {
        self.source.stop();
    }

    /// Whether a session is currently active
    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }
}
