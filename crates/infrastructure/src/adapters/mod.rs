//! Port adapters

mod speech_adapter;

pub use speech_adapter::{SpeechInputAdapter, SpeechOutputAdapter, build_speech_adapters};
