//! Scene image generation.
//!
//! `ImageApiClient` posts a prompt to the image endpoint and writes the
//! decoded result to the target path. Any remote failure degrades to a
//! flat placeholder card so one bad scene never stalls a whole job.

use std::path::Path;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::error::{ProviderError, ProviderResult};

/// Requested and fallback frame size, 9:16 portrait.
const FRAME_WIDTH: u32 = 1080;
const FRAME_HEIGHT: u32 = 1920;

/// Fill color for placeholder cards.
const PLACEHOLDER_RGB: [u8; 3] = [73, 109, 137];

/// Where a provider asset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetOrigin {
    /// The remote provider produced the asset.
    Generated,
    /// A local stand-in was written instead.
    Fallback,
}

/// Produces a scene image at a target path.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate an image for `prompt` and write it to `target`.
    ///
    /// On `Ok` a usable image exists at `target`; the origin tells the
    /// caller whether the provider delivered or a fallback was used.
    async fn generate_image(&self, prompt: &str, target: &Path) -> ProviderResult<AssetOrigin>;
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    prompt: &'a str,
    width: u32,
    height: u32,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    images: Vec<ImagePayload>,
}

#[derive(Debug, Deserialize)]
struct ImagePayload {
    data: String,
}

/// HTTP image client with a placeholder fallback.
pub struct ImageApiClient {
    config: ProviderConfig,
    client: Client,
}

impl ImageApiClient {
    /// Create a client from provider configuration.
    pub fn new(config: ProviderConfig) -> ProviderResult<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { config, client })
    }

    async fn request_image(
        &self,
        api_key: &str,
        prompt: &str,
        target: &Path,
    ) -> ProviderResult<()> {
        debug!(url = %self.config.image_url, "Requesting scene image");

        let request = ImageRequest {
            prompt,
            width: FRAME_WIDTH,
            height: FRAME_HEIGHT,
        };

        let response = self
            .client
            .post(&self.config.image_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            return Err(ProviderError::api(format!(
                "Image endpoint returned {}: {}",
                status, body
            )));
        }

        let payload: ImageResponse = response.json().await?;
        let Some(first) = payload.images.first() else {
            return Err(ProviderError::api("Image response carried no images"));
        };
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&first.data)
            .map_err(|e| ProviderError::api(format!("Invalid base64 image data: {}", e)))?;

        tokio::fs::write(target, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl ImageGenerator for ImageApiClient {
    async fn generate_image(&self, prompt: &str, target: &Path) -> ProviderResult<AssetOrigin> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            debug!("No API key configured, writing placeholder image");
            write_placeholder(target).await?;
            return Ok(AssetOrigin::Fallback);
        };

        match self.request_image(api_key, prompt, target).await {
            Ok(()) => Ok(AssetOrigin::Generated),
            Err(e) => {
                warn!(error = %e, "Image generation failed, writing placeholder");
                write_placeholder(target).await?;
                Ok(AssetOrigin::Fallback)
            }
        }
    }
}

/// Write a flat-color card sized like a video frame.
///
/// PNG encoding blocks, so it runs off the async runtime.
async fn write_placeholder(target: &Path) -> ProviderResult<()> {
    let target = target.to_path_buf();
    tokio::task::spawn_blocking(move || -> ProviderResult<()> {
        let card = image::RgbImage::from_pixel(FRAME_WIDTH, FRAME_HEIGHT, image::Rgb(PLACEHOLDER_RGB));
        card.save(&target)?;
        Ok(())
    })
    .await??;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use tempfile::TempDir;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(image_url: String, api_key: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            api_key: api_key.map(str::to_string),
            image_url,
            ..ProviderConfig::default()
        }
    }

    #[tokio::test]
    async fn test_generated_image_written_to_target() {
        let server = MockServer::start().await;
        let png_bytes = b"png-bytes-from-provider".to_vec();
        let encoded = base64::engine::general_purpose::STANDARD.encode(&png_bytes);
        Mock::given(method("POST"))
            .and(path("/v1/images:generate"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "images": [{ "data": encoded }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let target = dir.path().join("scene_0.png");
        let config = config_for(format!("{}/v1/images:generate", server.uri()), Some("test-key"));
        let client = ImageApiClient::new(config).unwrap();

        let origin = client
            .generate_image("a quiet harbor at dawn", &target)
            .await
            .unwrap();

        assert_eq!(origin, AssetOrigin::Generated);
        assert_eq!(std::fs::read(&target).unwrap(), png_bytes);
    }

    #[tokio::test]
    async fn test_server_error_falls_back_to_placeholder() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let target = dir.path().join("scene_1.png");
        let client = ImageApiClient::new(config_for(server.uri(), Some("test-key"))).unwrap();

        let origin = client.generate_image("anything", &target).await.unwrap();

        assert_eq!(origin, AssetOrigin::Fallback);
        let (width, height) = image::image_dimensions(&target).unwrap();
        assert_eq!((width, height), (1080, 1920));
    }

    #[tokio::test]
    async fn test_empty_payload_falls_back_to_placeholder() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "images": [] })),
            )
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let target = dir.path().join("scene_2.png");
        let client = ImageApiClient::new(config_for(server.uri(), Some("test-key"))).unwrap();

        let origin = client.generate_image("anything", &target).await.unwrap();

        assert_eq!(origin, AssetOrigin::Fallback);
        assert!(target.exists());
    }

    #[tokio::test]
    async fn test_missing_key_skips_network() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("scene_3.png");
        let client = ImageApiClient::new(ProviderConfig::default()).unwrap();

        let origin = client.generate_image("anything", &target).await.unwrap();

        assert_eq!(origin, AssetOrigin::Fallback);
        assert!(target.exists());
    }
}
