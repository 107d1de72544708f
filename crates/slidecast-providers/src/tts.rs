//! Narration speech synthesis.
//!
//! `SpeechApiClient` posts the narration text to the speech endpoint and
//! writes the returned audio bytes to the target path. When the endpoint
//! is unreachable or unconfigured it writes a silent track of the
//! expected length instead, so composition always has audio to map.

use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::images::AssetOrigin;

/// Synthesizes narration audio at a target path.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` to `target`.
    ///
    /// `expected_secs` sizes the silent fallback. Real synthesis keeps
    /// whatever length the provider returns.
    async fn synthesize(
        &self,
        text: &str,
        target: &Path,
        expected_secs: f64,
    ) -> ProviderResult<AssetOrigin>;
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    input: SpeechInput<'a>,
    voice: VoiceSelection<'a>,
    #[serde(rename = "audioConfig")]
    audio_config: AudioConfig<'a>,
}

#[derive(Debug, Serialize)]
struct SpeechInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct VoiceSelection<'a> {
    #[serde(rename = "languageCode")]
    language_code: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct AudioConfig<'a> {
    #[serde(rename = "audioEncoding")]
    audio_encoding: &'a str,
}

/// HTTP speech client with a silent-track fallback.
pub struct SpeechApiClient {
    config: ProviderConfig,
    client: Client,
}

impl SpeechApiClient {
    /// Create a client from provider configuration.
    pub fn new(config: ProviderConfig) -> ProviderResult<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { config, client })
    }

    async fn request_speech(&self, api_key: &str, text: &str, target: &Path) -> ProviderResult<()> {
        debug!(url = %self.config.tts_url, chars = text.len(), "Requesting narration audio");

        let request = SpeechRequest {
            input: SpeechInput { text },
            voice: VoiceSelection {
                language_code: &self.config.language,
                name: &self.config.voice,
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
            },
        };

        let response = self
            .client
            .post(&self.config.tts_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            return Err(ProviderError::api(format!(
                "Speech endpoint returned {}: {}",
                status, body
            )));
        }

        let bytes = response.bytes().await?;
        tokio::fs::write(target, &bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl SpeechSynthesizer for SpeechApiClient {
    async fn synthesize(
        &self,
        text: &str,
        target: &Path,
        expected_secs: f64,
    ) -> ProviderResult<AssetOrigin> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            debug!("No API key configured, writing silent narration");
            slidecast_media::write_silence(target, expected_secs).await?;
            return Ok(AssetOrigin::Fallback);
        };

        match self.request_speech(api_key, text, target).await {
            Ok(()) => Ok(AssetOrigin::Generated),
            Err(e) => {
                warn!(error = %e, "Speech synthesis failed, writing silent narration");
                slidecast_media::write_silence(target, expected_secs).await?;
                Ok(AssetOrigin::Fallback)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidecast_media::probe_duration;
    use tempfile::TempDir;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(tts_url: String, api_key: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            api_key: api_key.map(str::to_string),
            tts_url,
            ..ProviderConfig::default()
        }
    }

    #[tokio::test]
    async fn test_generated_speech_written_to_target() {
        let server = MockServer::start().await;
        let audio = b"ID3fake-mp3-bytes".to_vec();
        Mock::given(method("POST"))
            .and(path("/v1/text:speech"))
            .and(body_json(serde_json::json!({
                "input": { "text": "Hello world" },
                "voice": { "languageCode": "ko-KR", "name": "ko-KR-Standard-A" },
                "audioConfig": { "audioEncoding": "MP3" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(audio.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let target = dir.path().join("narration.mp3");
        let config = config_for(format!("{}/v1/text:speech", server.uri()), Some("test-key"));
        let client = SpeechApiClient::new(config).unwrap();

        let origin = client.synthesize("Hello world", &target, 10.0).await.unwrap();

        assert_eq!(origin, AssetOrigin::Generated);
        assert_eq!(std::fs::read(&target).unwrap(), audio);
    }

    #[tokio::test]
    #[ignore = "requires ffmpeg"]
    async fn test_missing_key_writes_expected_silence() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("narration.mp3");
        let client = SpeechApiClient::new(ProviderConfig::default()).unwrap();

        let origin = client.synthesize("Hello world", &target, 2.0).await.unwrap();

        assert_eq!(origin, AssetOrigin::Fallback);
        let secs = probe_duration(&target).await.unwrap();
        assert!((secs - 2.0).abs() < 0.3, "unexpected duration {}", secs);
    }

    #[tokio::test]
    #[ignore = "requires ffmpeg"]
    async fn test_server_error_falls_back_to_silence() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let target = dir.path().join("narration.mp3");
        let client = SpeechApiClient::new(config_for(server.uri(), Some("test-key"))).unwrap();

        let origin = client.synthesize("Hello world", &target, 1.5).await.unwrap();

        assert_eq!(origin, AssetOrigin::Fallback);
        assert!(target.exists());
    }
}
