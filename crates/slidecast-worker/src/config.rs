//! Worker configuration.

use std::path::PathBuf;

use slidecast_media::{RenderOptions, TransitionKind};
use slidecast_models::EncodingConfig;

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Maximum concurrent jobs
    pub max_concurrent_jobs: usize,
    /// Maximum scene images generated in parallel within one job
    pub max_image_parallel: usize,
    /// Root directory for per-job scratch directories
    pub work_dir: PathBuf,
    /// Output frame width
    pub frame_width: u32,
    /// Output frame height
    pub frame_height: u32,
    /// Cross-fade length between scenes in seconds
    pub transition_secs: f64,
    /// Cross-fade style
    pub transition: TransitionKind,
    /// Upper bound for one render invocation in seconds
    pub render_timeout_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: 2,
            max_image_parallel: 4,
            work_dir: PathBuf::from("/tmp/slidecast"),
            frame_width: 1080,
            frame_height: 1920,
            transition_secs: 0.5,
            transition: TransitionKind::Fade,
            render_timeout_secs: 600,
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            max_concurrent_jobs: std::env::var("WORKER_MAX_JOBS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
            max_image_parallel: std::env::var("WORKER_MAX_IMAGE_PARALLEL")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(4),
            work_dir: std::env::var("WORKER_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/tmp/slidecast")),
            frame_width: std::env::var("FRAME_WIDTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1080),
            frame_height: std::env::var("FRAME_HEIGHT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1920),
            transition_secs: std::env::var("TRANSITION_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0.5),
            transition: std::env::var("TRANSITION_STYLE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            render_timeout_secs: std::env::var("WORKER_RENDER_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(600),
        }
    }

    /// Render options derived from this configuration.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            width: self.frame_width,
            height: self.frame_height,
            transition_secs: self.transition_secs,
            transition: self.transition,
            encoding: EncodingConfig::default(),
            timeout_secs: self.render_timeout_secs,
        }
    }
}
