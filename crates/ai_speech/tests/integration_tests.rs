//! Integration tests for the HTTP speech provider against mock services

use ai_speech::{HttpSpeechProvider, SpeechConfig, SpeechError, SpeechToText, TextToSpeech};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(stt_url: &str, tts_url: &str) -> SpeechConfig {
    serde_json::from_value(serde_json::json!({
        "stt_url": stt_url,
        "tts_url": tts_url,
        "timeout_ms": 2_000,
    }))
    .expect("config should deserialize")
}

async fn provider_for(server: &MockServer) -> HttpSpeechProvider {
    HttpSpeechProvider::new(config_for(&server.uri(), &server.uri()))
        .expect("provider should build from a valid config")
}

#[tokio::test]
async fn transcribe_posts_wav_and_parses_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transcribe"))
        .and(header("content-type", "audio/wav"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "text": "add two cloves of garlic",
            "language": "en"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let transcription = provider.transcribe(&[82, 73, 70, 70]).await.unwrap();

    assert_eq!(transcription.text, "add two cloves of garlic");
    assert_eq!(transcription.language.as_deref(), Some("en"));
}

#[tokio::test]
async fn transcribe_maps_server_error_to_recognition() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transcribe"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let result = provider.transcribe(&[0, 1, 2]).await;

    assert!(matches!(result, Err(SpeechError::Recognition(_))));
}

#[tokio::test]
async fn synthesize_sends_voice_and_returns_audio() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/synthesize"))
        .and(body_json(serde_json::json!({
            "text": "Dinner is ready",
            "voice": "amy"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 64]))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let audio = provider.synthesize("Dinner is ready", Some("amy")).await.unwrap();

    assert_eq!(audio.len(), 64);
}

#[tokio::test]
async fn synthesize_rejects_empty_audio() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/synthesize"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(Vec::new()))
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let result = provider.synthesize("hello", None).await;

    assert!(matches!(result, Err(SpeechError::Synthesis(_))));
}

#[tokio::test]
async fn list_voices_parses_catalog() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/voices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": "amy", "name": "Amy", "language": "en-GB" },
            { "id": "pierre", "name": "Pierre", "language": "fr-FR" }
        ])))
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let voices = provider.list_voices().await.unwrap();

    assert_eq!(voices.len(), 2);
    assert_eq!(voices[0].id, "amy");
    assert_eq!(voices[1].language, "fr-FR");
}

#[tokio::test]
async fn health_check_reflects_service_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    assert!(SpeechToText::is_available(&provider).await);
    assert!(TextToSpeech::is_available(&provider).await);
}

#[tokio::test]
async fn unreachable_service_reports_unavailable() {
    let provider = HttpSpeechProvider::new(config_for(
        "http://127.0.0.1:1",
        "http://127.0.0.1:1",
    ))
    .unwrap();

    assert!(!SpeechToText::is_available(&provider).await);
}

#[tokio::test]
async fn connection_failure_maps_to_connection_error() {
    let provider = HttpSpeechProvider::new(config_for(
        "http://127.0.0.1:1",
        "http://127.0.0.1:1",
    ))
    .unwrap();

    let result = provider.transcribe(&[0, 1, 2]).await;
    assert!(matches!(result, Err(SpeechError::ConnectionFailed(_))));
}
