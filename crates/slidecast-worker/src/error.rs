//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Job failed: {0}")]
    JobFailed(String),

    #[error("Job cancelled")]
    Cancelled,

    #[error("Script error: {0}")]
    Script(#[from] slidecast_models::ScriptError),

    #[error("Scene error: {0}")]
    Scene(#[from] slidecast_models::SceneError),

    #[error("Media error: {0}")]
    Media(#[from] slidecast_media::MediaError),

    #[error("Provider error: {0}")]
    Provider(#[from] slidecast_providers::ProviderError),

    #[error("Registry error: {0}")]
    Registry(#[from] slidecast_jobs::JobsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn job_failed(msg: impl Into<String>) -> Self {
        Self::JobFailed(msg.into())
    }
}
