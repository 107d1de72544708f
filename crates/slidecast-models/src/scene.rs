//! Scene types produced by script parsing.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Maximum reasonable narration timeline (24 hours in seconds).
pub const MAX_TIMELINE_SECS: f64 = 86400.0;

/// A single narrated scene from a timestamped script.
///
/// Scenes are only produced by the script parser. The constructor
/// enforces `end > start`, so `duration()` is always positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Zero-based position in script order
    pub index: usize,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Narration text
    pub text: String,
    /// Visual description for image generation
    pub visual: String,
}

impl Scene {
    /// Create a scene, validating the timestamp pair.
    pub fn new(
        index: usize,
        start: f64,
        end: f64,
        text: impl Into<String>,
        visual: impl Into<String>,
    ) -> Result<Self, SceneError> {
        if start < 0.0 || end < 0.0 {
            return Err(SceneError::Negative);
        }
        if end <= start {
            return Err(SceneError::StartNotBeforeEnd { start, end });
        }
        if start > MAX_TIMELINE_SECS || end > MAX_TIMELINE_SECS {
            return Err(SceneError::ExceedsMaxTimeline(end));
        }
        Ok(Self {
            index,
            start,
            end,
            text: text.into(),
            visual: visual.into(),
        })
    }

    /// Scene duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Scene construction error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("Scene times cannot be negative")]
    Negative,

    #[error("Scene start ({start}s) must be before end ({end}s)")]
    StartNotBeforeEnd { start: f64, end: f64 },

    #[error("Scene end ({0}s) exceeds the maximum timeline of 24 hours")]
    ExceedsMaxTimeline(f64),
}

/// A generated image paired with its scene's display duration.
///
/// Owned by the orchestrator for the lifetime of one job; the compositor
/// only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneAsset {
    /// Index of the scene this asset belongs to
    pub scene_index: usize,
    /// Path to the rendered image
    pub image: PathBuf,
    /// Display duration in seconds, copied from the scene
    pub duration: f64,
}

impl SceneAsset {
    /// Pair an image file with its scene.
    pub fn for_scene(scene: &Scene, image: impl Into<PathBuf>) -> Self {
        Self {
            scene_index: scene.index,
            image: image.into(),
            duration: scene.duration(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_duration() {
        let scene = Scene::new(0, 1.5, 4.0, "Hello", "A door").unwrap();
        assert!((scene.duration() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_scene_rejects_end_before_start() {
        let result = Scene::new(0, 5.0, 3.0, "Hello", "A door");
        assert!(matches!(result, Err(SceneError::StartNotBeforeEnd { .. })));
    }

    #[test]
    fn test_scene_rejects_zero_duration() {
        let result = Scene::new(0, 3.0, 3.0, "Hello", "A door");
        assert!(matches!(result, Err(SceneError::StartNotBeforeEnd { .. })));
    }

    #[test]
    fn test_scene_rejects_over_max_timeline() {
        let result = Scene::new(0, 0.0, MAX_TIMELINE_SECS + 1.0, "Hello", "A door");
        assert!(matches!(result, Err(SceneError::ExceedsMaxTimeline(_))));
    }

    #[test]
    fn test_asset_copies_scene_duration() {
        let scene = Scene::new(2, 3.0, 6.0, "World", "An icon").unwrap();
        let asset = SceneAsset::for_scene(&scene, "/tmp/scene_2.png");
        assert_eq!(asset.scene_index, 2);
        assert!((asset.duration - 3.0).abs() < 1e-9);
    }
}
