//! Chat transcript store
//!
//! Holds the session transcript in memory and mirrors it wholesale into the
//! local cache after every change. Persistence failures are logged and
//! swallowed: a full disk must never break the conversation. A corrupt
//! cached transcript is discarded on load.

use std::fmt;
use std::sync::Arc;

use domain::{ChatMessage, Transcript};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::ports::{LocalCachePort, slots};

/// Service owning the capped chat transcript
pub struct TranscriptService {
    cache: Arc<dyn LocalCachePort>,
    transcript: Mutex<Transcript>,
}

impl fmt::Debug for TranscriptService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranscriptService")
            .field("len", &self.transcript.lock().len())
            .finish_non_exhaustive()
    }
}

impl TranscriptService {
    /// Load the transcript from the cache, starting empty if the slot is
    /// absent or unreadable
    pub async fn load(cache: Arc<dyn LocalCachePort>) -> Self {
        let transcript = match cache.read(slots::CHAT_HISTORY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Transcript>(&raw) {
                Ok(transcript) => transcript,
                Err(e) => {
                    warn!(error = %e, "Discarding corrupt chat history");
                    Transcript::new()
                },
            },
            Ok(None) => Transcript::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read chat history");
                Transcript::new()
            },
        };

        debug!(messages = transcript.len(), "Chat transcript loaded");
        Self {
            cache,
            transcript: Mutex::new(transcript),
        }
    }

    /// Append a user message and persist
    pub async fn push_user(&self, text: impl Into<String>) -> ChatMessage {
        let message = ChatMessage::user(text);
        self.push(message.clone()).await;
        message
    }

    /// Append a bot message and persist
    pub async fn push_bot(&self, text: impl Into<String>) -> ChatMessage {
        let message = ChatMessage::bot(text);
        self.push(message.clone()).await;
        message
    }

    async fn push(&self, message: ChatMessage) {
        let snapshot = {
            let mut transcript = self.transcript.lock();
            transcript.push(message);
            serde_json::to_string(&*transcript)
        };

        match snapshot {
            Ok(json) => {
                if let Err(e) = self.cache.write(slots::CHAT_HISTORY, &json).await {
                    warn!(error = %e, "Failed to persist chat history");
                }
            },
            Err(e) => warn!(error = %e, "Failed to serialize chat history"),
        }
    }

    /// Current transcript contents, oldest first
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.transcript.lock().to_vec()
    }

    /// The most recent bot message, if any
    pub fn last_bot_message(&self) -> Option<ChatMessage> {
        self.transcript
            .lock()
            .iter()
            .rev()
            .find(|m| m.sender == domain::Sender::Bot)
            .cloned()
    }

    /// Number of messages currently held
    pub fn len(&self) -> usize {
        self.transcript.lock().len()
    }

    /// Whether the transcript is empty
    pub fn is_empty(&self) -> bool {
        self.transcript.lock().is_empty()
    }

    /// Drop all messages and clear the cached copy
    pub async fn clear(&self) {
        self.transcript.lock().clear();
        if let Err(e) = self.cache.remove(slots::CHAT_HISTORY).await {
            warn!(error = %e, "Failed to clear cached chat history");
        }
    }
}
