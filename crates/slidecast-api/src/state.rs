//! Application state.

use std::sync::Arc;

use slidecast_jobs::JobStore;
use slidecast_providers::{ImageApiClient, ProviderConfig, SpeechApiClient};
use slidecast_worker::{FfmpegRenderer, Orchestrator, WorkerConfig};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    /// Create new application state.
    ///
    /// Wires the orchestrator to the HTTP providers and the FFmpeg
    /// renderer, with everything configured from the environment.
    pub fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let provider_config = ProviderConfig::from_env();
        let images = Arc::new(ImageApiClient::new(provider_config.clone())?);
        let speech = Arc::new(SpeechApiClient::new(provider_config)?);

        let orchestrator = Arc::new(Orchestrator::new(
            WorkerConfig::from_env(),
            JobStore::new(),
            images,
            speech,
            Arc::new(FfmpegRenderer),
        ));

        Ok(Self {
            config,
            orchestrator,
        })
    }

    /// Create state around an existing orchestrator.
    pub fn with_orchestrator(config: ApiConfig, orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            config,
            orchestrator,
        }
    }
}
