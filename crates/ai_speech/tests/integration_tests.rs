//! Integration tests for ai_speech crate
//!
//! Exercises the provider against mocked OpenAI-compatible audio APIs,
//! including a Groq-style base URL with a path prefix.

use std::io::Write;

use ai_speech::{
    AudioFormat, OpenAiSpeechProvider, SpeechConfig, SpeechError, SpeechToText, SynthesisRequest,
    TextToSpeech,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Create a test configuration pointing to mock server
fn test_config(base_url: &str) -> SpeechConfig {
    SpeechConfig {
        api_key: Some("test-api-key".to_string()),
        base_url: base_url.to_string(),
        default_voice: "alloy".to_string(),
        output_format: AudioFormat::Mp3,
        timeout_ms: 5000,
    }
}

/// Minimal MP3 frame header
fn mock_mp3_audio() -> Vec<u8> {
    vec![0xFF, 0xFB, 0x90, 0x00, 0x00, 0x00, 0x00, 0x00]
}

fn staged(ext: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(&format!(".{ext}"))
        .tempfile()
        .unwrap();
    file.write_all(&mock_mp3_audio()).unwrap();
    file
}

// ============ STT Integration Tests ============

#[tokio::test]
async fn groq_style_base_url_is_honoured() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/v1/audio/transcriptions"))
        .and(header("Authorization", "Bearer test-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "text": "Guten Morgen"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider =
        OpenAiSpeechProvider::new(test_config(&format!("{}/openai/v1", mock_server.uri())))
            .unwrap();
    let file = staged("m4a");

    let transcription = provider
        .transcribe_file(file.path(), "whisper-large-v3-turbo", Some("de"))
        .await
        .unwrap();

    assert_eq!(transcription.text, "Guten Morgen");
    assert!(transcription.language.is_none());
}

#[tokio::test]
async fn unauthorized_transcription_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {"message": "Invalid API Key", "type": "invalid_request_error", "code": "invalid_api_key"}
        })))
        .mount(&mock_server)
        .await;

    let provider = OpenAiSpeechProvider::new(test_config(&mock_server.uri())).unwrap();
    let file = staged("mp3");

    let err = provider
        .transcribe_file(file.path(), "whisper-1", None)
        .await
        .unwrap_err();
    assert!(matches!(err, SpeechError::Unauthorized(ref m) if m == "Invalid API Key"));
}

// ============ TTS Integration Tests ============

#[tokio::test]
async fn sequential_chunks_are_synthesized_independently() {
    let mock_server = MockServer::start().await;

    for (text, audio) in [("Uno", vec![1u8]), ("Dos", vec![2u8])] {
        Mock::given(method("POST"))
            .and(path("/audio/speech"))
            .and(body_partial_json(serde_json::json!({"input": text})))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(audio))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let provider = OpenAiSpeechProvider::new(test_config(&mock_server.uri())).unwrap();

    let first = provider
        .synthesize(&SynthesisRequest::new("Uno", "tts-1"))
        .await
        .unwrap();
    let second = provider
        .synthesize(&SynthesisRequest::new("Dos", "tts-1"))
        .await
        .unwrap();

    assert_eq!(first.into_data(), vec![1]);
    assert_eq!(second.into_data(), vec![2]);
}

#[tokio::test]
async fn explicit_voice_overrides_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/audio/speech"))
        .and(body_partial_json(serde_json::json!({"voice": "nova"})))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(mock_mp3_audio()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = OpenAiSpeechProvider::new(test_config(&mock_server.uri())).unwrap();
    let request = SynthesisRequest::new("Hallo", "tts-1").with_voice("nova");

    assert!(provider.synthesize(&request).await.is_ok());
}

#[tokio::test]
async fn slow_synthesis_times_out_with_budget() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/audio/speech"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(mock_mp3_audio())
                .set_delay(std::time::Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let mut config = test_config(&mock_server.uri());
    config.timeout_ms = 50;
    let provider = OpenAiSpeechProvider::new(config).unwrap();

    let err = provider
        .synthesize(&SynthesisRequest::new("Hi", "tts-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, SpeechError::Timeout(50)));
}
