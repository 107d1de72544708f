//! Provider error types.

use thiserror::Error;

/// Result alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors from the asset providers.
///
/// Remote failures are normally absorbed into a fallback asset, so
/// callers only see these when the fallback itself cannot be produced.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider API error: {0}")]
    Api(String),

    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Media error: {0}")]
    Media(#[from] slidecast_media::MediaError),

    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProviderError {
    /// Create an API error from a message.
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api(message.into())
    }
}
