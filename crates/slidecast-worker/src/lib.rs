//! Slideshow generation worker.
//!
//! This crate provides:
//! - The job orchestrator driving each pipeline stage in order
//! - Bounded parallel scene image generation
//! - The rendering seam over the FFmpeg compositor
//! - Progress and cancellation plumbed through the job registry

pub mod assets;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod renderer;

pub use assets::{generate_scene_assets, SceneAssets};
pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use orchestrator::Orchestrator;
pub use renderer::{FfmpegRenderer, SlideshowRenderer};
