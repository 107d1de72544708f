//! Rendering seam.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use slidecast_media::{compose_slideshow, MediaResult, RenderOptions};
use slidecast_models::SceneAsset;

/// Renders a finished slideshow from per-scene assets.
///
/// Pipeline tests swap in a stub here instead of spawning FFmpeg.
#[async_trait]
pub trait SlideshowRenderer: Send + Sync {
    async fn render(
        &self,
        assets: &[SceneAsset],
        narration: &Path,
        subtitles: &Path,
        output: &Path,
        opts: &RenderOptions,
    ) -> MediaResult<PathBuf>;
}

/// Renderer backed by the FFmpeg CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegRenderer;

#[async_trait]
impl SlideshowRenderer for FfmpegRenderer {
    async fn render(
        &self,
        assets: &[SceneAsset],
        narration: &Path,
        subtitles: &Path,
        output: &Path,
        opts: &RenderOptions,
    ) -> MediaResult<PathBuf> {
        compose_slideshow(assets, narration, subtitles, output, opts).await
    }
}
