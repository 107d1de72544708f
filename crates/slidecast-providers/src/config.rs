//! Provider configuration.

use std::env;
use std::time::Duration;

/// Default image generation endpoint.
const DEFAULT_IMAGE_URL: &str = "https://api.generativeai.googleapis.com/v1/images:generate";

/// Default speech synthesis endpoint.
const DEFAULT_TTS_URL: &str = "https://api.generativeai.googleapis.com/v1/text:speech";

/// Configuration shared by the remote asset providers.
///
/// A missing API key is not a startup error. Every provider degrades to
/// a locally produced fallback, so an unconfigured environment still
/// renders complete videos.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Bearer key for the generation endpoints
    pub api_key: Option<String>,
    /// Image generation endpoint URL
    pub image_url: String,
    /// Speech synthesis endpoint URL
    pub tts_url: String,
    /// Voice name sent to the speech endpoint
    pub voice: String,
    /// Language code sent to the speech endpoint
    pub language: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            image_url: DEFAULT_IMAGE_URL.to_string(),
            tts_url: DEFAULT_TTS_URL.to_string(),
            voice: "ko-KR-Standard-A".to_string(),
            language: "ko-KR".to_string(),
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl ProviderConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env::var("GEMINI_API_KEY").ok().filter(|key| !key.is_empty()),
            image_url: env::var("IMAGE_API_URL").unwrap_or(defaults.image_url),
            tts_url: env::var("TTS_API_URL").unwrap_or(defaults.tts_url),
            voice: env::var("TTS_VOICE").unwrap_or(defaults.voice),
            language: env::var("TTS_LANGUAGE").unwrap_or(defaults.language),
            request_timeout: env::var("PROVIDER_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_have_no_key() {
        let config = ProviderConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.request_timeout, Duration::from_secs(120));
    }
}
