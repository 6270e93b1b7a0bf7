//! AI Speech - Speech-to-Text and Text-to-Speech abstractions
//!
//! Provides the speech capability boundary for SousChef:
//! - `SpeechToText` / `TextToSpeech` - transcription and synthesis ports
//! - `AudioSource` / `AudioPlayer` - microphone capture and playback ports
//! - [`Listener`] - one-shot speech input session (record, transcribe, idle)
//! - [`Speaker`] - last-call-wins speech output with voice selection
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the traits (ports)
//! - `providers` module contains the HTTP-backed STT/TTS adapter
//! - `capture` / `playback` contain command-line-tool audio adapters
//!
//! Absence of speech configuration degrades to [`SpeechError::Unsupported`];
//! callers surface a notice and disable voice for the session.

pub mod capture;
pub mod config;
pub mod error;
pub mod listener;
pub mod playback;
pub mod ports;
pub mod providers;
pub mod speaker;
pub mod types;

pub use capture::CommandRecorder;
pub use config::{PlayerConfig, RecorderConfig, SpeechConfig};
pub use error::SpeechError;
pub use listener::{ListenOutcome, Listener};
pub use playback::CommandPlayer;
pub use ports::{AudioPlayer, AudioSource, PlayOutcome, RecordOutcome, SpeechToText, TextToSpeech};
pub use providers::HttpSpeechProvider;
pub use speaker::Speaker;
pub use types::{Transcription, VoiceInfo};
