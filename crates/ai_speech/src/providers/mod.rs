//! Concrete speech providers (adapters)

mod http;

pub use http::HttpSpeechProvider;
