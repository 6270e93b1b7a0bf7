//! Chat transcript - capped, append-only message history

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::ChatMessage;

/// Maximum number of messages retained in a transcript
pub const MAX_TRANSCRIPT_LEN: usize = 50;

/// Ordered sequence of chat messages, capped at [`MAX_TRANSCRIPT_LEN`]
///
/// Insertion order equals display order. Appending past the cap evicts
/// the oldest message first (FIFO).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: VecDeque<ChatMessage>,
}

impl Transcript {
    /// Create a new empty transcript
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a transcript from an ordered message list
    ///
    /// Keeps only the most recent [`MAX_TRANSCRIPT_LEN`] entries, preserving
    /// relative order.
    #[must_use]
    pub fn from_messages(messages: Vec<ChatMessage>) -> Self {
        let mut transcript = Self::new();
        for message in messages {
            transcript.push(message);
        }
        transcript
    }

    /// Append a message, evicting the oldest entry when over the cap
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push_back(message);
        while self.messages.len() > MAX_TRANSCRIPT_LEN {
            self.messages.pop_front();
        }
    }

    /// Iterate over messages in display order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    /// Copy the messages out in display order
    #[must_use]
    pub fn to_vec(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    /// Get the most recent message
    #[must_use]
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.back()
    }

    /// Number of messages currently retained
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if the transcript is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Remove all messages
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a ChatMessage;
    type IntoIter = std::collections::vec_deque::Iter<'a, ChatMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
