//! Chat session controller
//!
//! Orchestrates one conversation: transcript updates, the assistant
//! backend round-trip, and the voice loop. The session is always in
//! exactly one of three phases (idle, listening, speaking); voice input
//! and output are explicit async operations with first-class
//! cancellation. A generation counter makes superseded backend responses
//! and utterances drop out silently instead of racing the current one.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use domain::ChatMessage;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, instrument, warn};

use crate::error::ApplicationError;
use crate::formatting::clean_for_speech;
use crate::ports::{ChatBackendPort, SpeechInputOutcome, SpeechInputPort, SpeechOutputPort};
use crate::services::TranscriptService;

/// Pause before speaking a reply aloud, letting the rendered text land first
const AUTO_SPEAK_DELAY: Duration = Duration::from_millis(500);

/// Pause between silencing output and opening the microphone
const STOP_BEFORE_LISTEN_DELAY: Duration = Duration::from_millis(100);

/// Pause between receiving a transcript and submitting it
const AUTO_SUBMIT_DELAY: Duration = Duration::from_millis(300);

/// Reply shown when the backend fails
const APOLOGY: &str = "Sorry, I encountered an error. Please try again later.";

/// What the session is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for input
    Idle,
    /// Microphone open, waiting for an utterance
    Listening,
    /// Speaking a reply aloud
    Speaking,
}

/// Notifications emitted while the session works
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The backend request went out; show a typing indicator
    TypingStarted,
    /// The backend responded or failed; hide the typing indicator
    TypingFinished,
    /// The session changed phase
    PhaseChanged(SessionPhase),
    /// Something the user should see, outside the transcript
    Notice(String),
}

/// Result of submitting one message
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// The backend replied; the reply message is in the transcript
    Delivered(ChatMessage),
    /// The backend failed; an apology message is in the transcript
    Failed(ChatMessage),
    /// The input was blank and nothing happened
    Ignored,
    /// A newer message replaced this one before its reply arrived
    Superseded,
}

/// Controller for one chat session
pub struct ChatSession {
    backend: Arc<dyn ChatBackendPort>,
    transcript: Arc<TranscriptService>,
    speech_input: Option<Arc<dyn SpeechInputPort>>,
    speech_output: Option<Arc<dyn SpeechOutputPort>>,
    phase: Mutex<SessionPhase>,
    generation: AtomicU64,
    voice_replies: AtomicBool,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatSession")
            .field("phase", &*self.phase.lock())
            .field("voice_replies", &self.voice_replies)
            .finish_non_exhaustive()
    }
}

impl ChatSession {
    /// Create a text-only session
    pub fn new(
        backend: Arc<dyn ChatBackendPort>,
        transcript: Arc<TranscriptService>,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let session = Self {
            backend,
            transcript,
            speech_input: None,
            speech_output: None,
            phase: Mutex::new(SessionPhase::Idle),
            generation: AtomicU64::new(0),
            voice_replies: AtomicBool::new(false),
            events,
        };
        (session, receiver)
    }

    /// Attach speech input and output ports
    #[must_use]
    pub fn with_speech(
        mut self,
        input: Arc<dyn SpeechInputPort>,
        output: Arc<dyn SpeechOutputPort>,
    ) -> Self {
        self.speech_input = Some(input);
        self.speech_output = Some(output);
        self
    }

    /// Current session phase
    pub fn phase(&self) -> SessionPhase {
        *self.phase.lock()
    }

    /// Whether replies are spoken aloud automatically
    pub fn voice_replies(&self) -> bool {
        self.voice_replies.load(Ordering::SeqCst)
    }

    /// Turn automatic spoken replies on or off
    pub fn set_voice_replies(&self, enabled: bool) {
        self.voice_replies.store(enabled, Ordering::SeqCst);
    }

    /// Whether speech ports are attached
    pub fn speech_available(&self) -> bool {
        self.speech_input.is_some() && self.speech_output.is_some()
    }

    /// Submit a user message and wait for the reply
    ///
    /// Blank input is ignored. The user message lands in the transcript
    /// before the backend round-trip; the reply (or an apology on failure)
    /// lands after. If a newer message is submitted while this one is in
    /// flight, its reply is dropped and [`SendOutcome::Superseded`] is
    /// returned.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn send_message(&self, text: &str) -> Result<SendOutcome, ApplicationError> {
        self.send_inner(text, self.voice_replies()).await
    }

    async fn send_inner(
        &self,
        text: &str,
        speak_reply: bool,
    ) -> Result<SendOutcome, ApplicationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(SendOutcome::Ignored);
        }

        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.transcript.push_user(trimmed).await;

        self.emit(SessionEvent::TypingStarted);
        let backend_result = self.backend.ask(trimmed).await;
        self.emit(SessionEvent::TypingFinished);

        if self.generation.load(Ordering::SeqCst) != my_generation {
            debug!("Dropping superseded reply");
            return Ok(SendOutcome::Superseded);
        }

        let outcome = match backend_result {
            Ok(reply) => {
                let message = self.transcript.push_bot(reply).await;
                if speak_reply {
                    self.speak_reply(&message.text, my_generation).await;
                }
                SendOutcome::Delivered(message)
            },
            Err(e) => {
                warn!(error = %e, "Backend request failed");
                let message = self.transcript.push_bot(APOLOGY).await;
                SendOutcome::Failed(message)
            },
        };

        Ok(outcome)
    }

    async fn speak_reply(&self, text: &str, my_generation: u64) {
        let Some(output) = &self.speech_output else {
            return;
        };

        tokio::time::sleep(AUTO_SPEAK_DELAY).await;
        if self.generation.load(Ordering::SeqCst) != my_generation {
            return;
        }

        self.set_phase(SessionPhase::Speaking);
        if let Err(e) = output.speak(&clean_for_speech(text)).await {
            warn!(error = %e, "Failed to speak reply");
        }
        if self.generation.load(Ordering::SeqCst) == my_generation {
            self.set_phase(SessionPhase::Idle);
        }
    }

    /// Toggle voice input
    ///
    /// From idle, opens the microphone and auto-submits the transcript as a
    /// message whose reply is spoken aloud. While listening, cancels the
    /// session. While speaking, silences the reply first and then opens the
    /// microphone.
    #[instrument(skip(self))]
    pub async fn toggle_voice_input(&self) -> Result<SendOutcome, ApplicationError> {
        let Some(input) = self.speech_input.clone() else {
            self.emit(SessionEvent::Notice(
                "Voice input is not available in this session.".to_string(),
            ));
            return Ok(SendOutcome::Ignored);
        };

        match self.phase() {
            SessionPhase::Listening => {
                input.cancel();
                return Ok(SendOutcome::Ignored);
            },
            SessionPhase::Speaking => {
                // Supersede the in-flight utterance so its teardown cannot
                // overwrite the listening phase we are about to enter
                self.generation.fetch_add(1, Ordering::SeqCst);
                if let Some(output) = &self.speech_output {
                    output.stop();
                }
                self.set_phase(SessionPhase::Idle);
                tokio::time::sleep(STOP_BEFORE_LISTEN_DELAY).await;
            },
            SessionPhase::Idle => {},
        }

        self.set_phase(SessionPhase::Listening);
        let outcome = input.listen().await;
        self.set_phase(SessionPhase::Idle);

        match outcome {
            Ok(SpeechInputOutcome::Transcript(text)) => {
                tokio::time::sleep(AUTO_SUBMIT_DELAY).await;
                self.send_inner(&text, true).await
            },
            Ok(SpeechInputOutcome::Cancelled | SpeechInputOutcome::AlreadyListening) => {
                Ok(SendOutcome::Ignored)
            },
            Err(e) => {
                warn!(error = %e, "Voice input failed");
                self.emit(SessionEvent::Notice(format!("Voice input failed: {e}")));
                Ok(SendOutcome::Ignored)
            },
        }
    }

    /// Toggle spoken playback of the most recent reply
    ///
    /// While speaking, stops playback. Otherwise speaks the last bot
    /// message, if there is one.
    #[instrument(skip(self))]
    pub async fn toggle_speech_output(&self) -> Result<(), ApplicationError> {
        let Some(output) = &self.speech_output else {
            self.emit(SessionEvent::Notice(
                "Speech output is not available in this session.".to_string(),
            ));
            return Ok(());
        };

        if self.phase() == SessionPhase::Speaking {
            output.stop();
            self.set_phase(SessionPhase::Idle);
            return Ok(());
        }

        let Some(last) = self.transcript.last_bot_message() else {
            self.emit(SessionEvent::Notice("Nothing to speak yet.".to_string()));
            return Ok(());
        };

        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_phase(SessionPhase::Speaking);
        let result = output.speak(&clean_for_speech(&last.text)).await;
        if self.generation.load(Ordering::SeqCst) == my_generation {
            self.set_phase(SessionPhase::Idle);
        }
        result.map_err(|e| ApplicationError::Speech(e.to_string()))
    }

    /// Stop any active voice input or output and return to idle
    pub fn interrupt(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(input) = &self.speech_input {
            input.cancel();
        }
        if let Some(output) = &self.speech_output {
            output.stop();
        }
        self.set_phase(SessionPhase::Idle);
    }

    fn set_phase(&self, phase: SessionPhase) {
        let changed = {
            let mut current = self.phase.lock();
            if *current == phase {
                false
            } else {
                *current = phase;
                true
            }
        };
        if changed {
            self.emit(SessionEvent::PhaseChanged(phase));
        }
    }

    fn emit(&self, event: SessionEvent) {
        // Receiver may be gone during shutdown
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use domain::Sender;
    use parking_lot::Mutex as SyncMutex;
    use tokio::sync::Notify;

    use super::*;
    use crate::services::test_support::InMemoryCache;

    struct FixedBackend {
        reply: Result<String, String>,
    }

    #[async_trait]
    impl ChatBackendPort for FixedBackend {
        async fn ask(&self, _message: &str) -> Result<String, ApplicationError> {
            self.reply
                .clone()
                .map_err(ApplicationError::Backend)
        }

        async fn is_healthy(&self) -> bool {
            self.reply.is_ok()
        }
    }

    struct SlowBackend {
        release: Arc<Notify>,
    }

    #[async_trait]
    impl ChatBackendPort for SlowBackend {
        async fn ask(&self, message: &str) -> Result<String, ApplicationError> {
            self.release.notified().await;
            Ok(format!("echo: {message}"))
        }

        async fn is_healthy(&self) -> bool {
            true
        }
    }

    struct ScriptedInput {
        outcome: SpeechInputOutcome,
        cancelled: SyncMutex<bool>,
    }

    #[async_trait]
    impl SpeechInputPort for ScriptedInput {
        async fn listen(&self) -> Result<SpeechInputOutcome, ApplicationError> {
            Ok(self.outcome.clone())
        }

        fn cancel(&self) {
            *self.cancelled.lock() = true;
        }

        fn is_listening(&self) -> bool {
            false
        }
    }

    #[derive(Default)]
    struct SpyOutput {
        spoken: SyncMutex<Vec<String>>,
        stopped: SyncMutex<bool>,
    }

    #[async_trait]
    impl SpeechOutputPort for SpyOutput {
        async fn speak(&self, text: &str) -> Result<(), ApplicationError> {
            self.spoken.lock().push(text.to_string());
            Ok(())
        }

        fn stop(&self) {
            *self.stopped.lock() = true;
        }

        fn is_speaking(&self) -> bool {
            false
        }
    }

    struct LoggingOutput {
        log: Arc<SyncMutex<Vec<&'static str>>>,
        release: Notify,
    }

    #[async_trait]
    impl SpeechOutputPort for LoggingOutput {
        async fn speak(&self, _text: &str) -> Result<(), ApplicationError> {
            self.release.notified().await;
            // Playback teardown outlasts the stop-to-listen settle delay
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(())
        }

        fn stop(&self) {
            self.log.lock().push("stop");
            self.release.notify_waiters();
        }

        fn is_speaking(&self) -> bool {
            false
        }
    }

    struct GatedInput {
        log: Arc<SyncMutex<Vec<&'static str>>>,
        gate: Notify,
    }

    #[async_trait]
    impl SpeechInputPort for GatedInput {
        async fn listen(&self) -> Result<SpeechInputOutcome, ApplicationError> {
            self.log.lock().push("listen");
            self.gate.notified().await;
            Ok(SpeechInputOutcome::Cancelled)
        }

        fn cancel(&self) {
            self.gate.notify_waiters();
        }

        fn is_listening(&self) -> bool {
            false
        }
    }

    async fn transcript() -> Arc<TranscriptService> {
        Arc::new(TranscriptService::load(Arc::new(InMemoryCache::new())).await)
    }

    #[tokio::test]
    async fn delivered_reply_lands_in_transcript() {
        let (session, _events) = ChatSession::new(
            Arc::new(FixedBackend {
                reply: Ok("Try a stir fry.".to_string()),
            }),
            transcript().await,
        );

        let outcome = session.send_message("what's for dinner?").await.unwrap();

        match outcome {
            SendOutcome::Delivered(message) => {
                assert_eq!(message.sender, Sender::Bot);
                assert_eq!(message.text, "Try a stir fry.");
            },
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(session.transcript.len(), 2);
    }

    #[tokio::test]
    async fn backend_failure_yields_apology() {
        let (session, _events) = ChatSession::new(
            Arc::new(FixedBackend {
                reply: Err("boom".to_string()),
            }),
            transcript().await,
        );

        let outcome = session.send_message("hello?").await.unwrap();

        match outcome {
            SendOutcome::Failed(message) => {
                assert_eq!(
                    message.text,
                    "Sorry, I encountered an error. Please try again later."
                );
            },
            other => panic!("unexpected outcome: {other:?}"),
        }
        // User message and apology both recorded
        assert_eq!(session.transcript.len(), 2);
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let (session, _events) = ChatSession::new(
            Arc::new(FixedBackend {
                reply: Ok("unused".to_string()),
            }),
            transcript().await,
        );

        let outcome = session.send_message("   ").await.unwrap();

        assert_eq!(outcome, SendOutcome::Ignored);
        assert!(session.transcript.is_empty());
    }

    #[tokio::test]
    async fn typing_events_bracket_the_round_trip() {
        let (session, mut events) = ChatSession::new(
            Arc::new(FixedBackend {
                reply: Ok("sure".to_string()),
            }),
            transcript().await,
        );

        session.send_message("hi").await.unwrap();

        assert_eq!(events.recv().await, Some(SessionEvent::TypingStarted));
        assert_eq!(events.recv().await, Some(SessionEvent::TypingFinished));
    }

    #[tokio::test]
    async fn newer_message_supersedes_older_reply() {
        let release = Arc::new(Notify::new());
        let (session, _events) = ChatSession::new(
            Arc::new(SlowBackend {
                release: Arc::clone(&release),
            }),
            transcript().await,
        );
        let session = Arc::new(session);

        let first = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.send_message("first").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        let second = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.send_message("second").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        // Release both backend calls; only the newest reply survives
        release.notify_waiters();

        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();

        assert_eq!(first, SendOutcome::Superseded);
        assert!(matches!(second, SendOutcome::Delivered(_)));

        let texts: Vec<_> = session
            .transcript
            .messages()
            .into_iter()
            .filter(|m| m.sender == Sender::Bot)
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, vec!["echo: second"]);
    }

    #[tokio::test(start_paused = true)]
    async fn voice_transcript_is_submitted_and_spoken() {
        let output = Arc::new(SpyOutput::default());
        let (session, _events) = ChatSession::new(
            Arc::new(FixedBackend {
                reply: Ok("Line one\nLine two".to_string()),
            }),
            transcript().await,
        );
        let session = session.with_speech(
            Arc::new(ScriptedInput {
                outcome: SpeechInputOutcome::Transcript("plan my week".to_string()),
                cancelled: SyncMutex::new(false),
            }),
            Arc::clone(&output) as _,
        );

        let outcome = session.toggle_voice_input().await.unwrap();

        assert!(matches!(outcome, SendOutcome::Delivered(_)));
        let messages = session.transcript.messages();
        assert_eq!(messages[0].text, "plan my week");

        // Spoken form is the cleaned rendering
        let spoken = output.spoken.lock();
        assert_eq!(spoken.as_slice(), ["Line one. Line two"]);
    }

    #[tokio::test]
    async fn voice_input_without_ports_emits_notice() {
        let (session, mut events) = ChatSession::new(
            Arc::new(FixedBackend {
                reply: Ok("unused".to_string()),
            }),
            transcript().await,
        );

        let outcome = session.toggle_voice_input().await.unwrap();

        assert_eq!(outcome, SendOutcome::Ignored);
        assert!(matches!(events.recv().await, Some(SessionEvent::Notice(_))));
    }

    #[tokio::test]
    async fn toggle_speech_output_speaks_last_reply() {
        let output = Arc::new(SpyOutput::default());
        let (session, _events) = ChatSession::new(
            Arc::new(FixedBackend {
                reply: Ok("Use <b>fresh</b> basil".to_string()),
            }),
            transcript().await,
        );
        let session = session.with_speech(
            Arc::new(ScriptedInput {
                outcome: SpeechInputOutcome::Cancelled,
                cancelled: SyncMutex::new(false),
            }),
            Arc::clone(&output) as _,
        );

        session.send_message("basil tips").await.unwrap();
        session.toggle_speech_output().await.unwrap();

        let spoken = output.spoken.lock();
        assert_eq!(spoken.as_slice(), ["Use fresh basil"]);
    }

    #[tokio::test]
    async fn toggle_speech_output_with_empty_transcript_is_a_no_op() {
        let output = Arc::new(SpyOutput::default());
        let (session, _events) = ChatSession::new(
            Arc::new(FixedBackend {
                reply: Ok("unused".to_string()),
            }),
            transcript().await,
        );
        let session = session.with_speech(
            Arc::new(ScriptedInput {
                outcome: SpeechInputOutcome::Cancelled,
                cancelled: SyncMutex::new(false),
            }),
            Arc::clone(&output) as _,
        );

        session.toggle_speech_output().await.unwrap();

        assert!(output.spoken.lock().is_empty());
    }

    #[tokio::test]
    async fn interrupt_returns_to_idle() {
        let output = Arc::new(SpyOutput::default());
        let (session, _events) = ChatSession::new(
            Arc::new(FixedBackend {
                reply: Ok("unused".to_string()),
            }),
            transcript().await,
        );
        let session = session.with_speech(
            Arc::new(ScriptedInput {
                outcome: SpeechInputOutcome::Cancelled,
                cancelled: SyncMutex::new(false),
            }),
            Arc::clone(&output) as _,
        );

        session.interrupt();

        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(*output.stopped.lock());
    }

    #[tokio::test(start_paused = true)]
    async fn voice_input_while_speaking_silences_output_before_listening() {
        let log = Arc::new(SyncMutex::new(Vec::new()));
        let output = Arc::new(LoggingOutput {
            log: Arc::clone(&log),
            release: Notify::new(),
        });
        let input = Arc::new(GatedInput {
            log: Arc::clone(&log),
            gate: Notify::new(),
        });
        let (session, _events) = ChatSession::new(
            Arc::new(FixedBackend {
                reply: Ok("Simmer for ten minutes".to_string()),
            }),
            transcript().await,
        );
        let session =
            Arc::new(session.with_speech(Arc::clone(&input) as _, Arc::clone(&output) as _));

        session.send_message("how long?").await.unwrap();

        let speaking = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.toggle_speech_output().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(session.phase(), SessionPhase::Speaking);

        let listening = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.toggle_voice_input().await })
        };
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(log.lock().as_slice(), ["stop", "listen"]);

        input.cancel();
        assert_eq!(listening.await.unwrap().unwrap(), SendOutcome::Ignored);
        speaking.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_utterance_cannot_reclaim_the_phase() {
        let log = Arc::new(SyncMutex::new(Vec::new()));
        let output = Arc::new(LoggingOutput {
            log: Arc::clone(&log),
            release: Notify::new(),
        });
        let input = Arc::new(GatedInput {
            log: Arc::clone(&log),
            gate: Notify::new(),
        });
        let (session, _events) = ChatSession::new(
            Arc::new(FixedBackend {
                reply: Ok("Simmer for ten minutes".to_string()),
            }),
            transcript().await,
        );
        let session =
            Arc::new(session.with_speech(Arc::clone(&input) as _, Arc::clone(&output) as _));

        session.send_message("how long?").await.unwrap();

        let speaking = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.toggle_speech_output().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        let listening = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.toggle_voice_input().await })
        };
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(session.phase(), SessionPhase::Listening);

        // The silenced utterance finishes its teardown while the
        // microphone is open; the session must stay listening
        speaking.await.unwrap().unwrap();
        assert_eq!(session.phase(), SessionPhase::Listening);

        input.cancel();
        assert_eq!(listening.await.unwrap().unwrap(), SendOutcome::Ignored);
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn auto_speak_follows_delivered_reply_when_enabled() {
        let output = Arc::new(SpyOutput::default());
        let (session, _events) = ChatSession::new(
            Arc::new(FixedBackend {
                reply: Ok("Dinner is ready".to_string()),
            }),
            transcript().await,
        );
        let session = session.with_speech(
            Arc::new(ScriptedInput {
                outcome: SpeechInputOutcome::Cancelled,
                cancelled: SyncMutex::new(false),
            }),
            Arc::clone(&output) as _,
        );
        session.set_voice_replies(true);

        session.send_message("is it ready?").await.unwrap();

        let spoken = output.spoken.lock();
        assert_eq!(spoken.as_slice(), ["Dinner is ready"]);
    }
}
