//! Parallel scene image generation.
//!
//! Image requests are independent across scenes, so they run
//! concurrently under a shared permit cap. Results are reassembled
//! in scene order before composition, which depends on input order.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::debug;

use slidecast_models::{build_image_prompt, Scene, SceneAsset};
use slidecast_providers::{AssetOrigin, ImageGenerator};

use crate::error::{WorkerError, WorkerResult};

/// Scene assets plus how many of them came from fallbacks.
pub struct SceneAssets {
    pub assets: Vec<SceneAsset>,
    pub fallback_count: usize,
}

/// Generate one image per scene under `scratch`, at most `slots` at a time.
///
/// Returned assets follow scene order regardless of completion order.
/// `on_done` sees the running count of finished scenes, one call per
/// scene.
pub async fn generate_scene_assets<F>(
    scenes: &[Scene],
    images: &dyn ImageGenerator,
    scratch: &Path,
    slots: Arc<Semaphore>,
    on_done: F,
) -> WorkerResult<SceneAssets>
where
    F: Fn(usize) + Send + Sync,
{
    let done = AtomicUsize::new(0);
    let done = &done;
    let on_done = &on_done;

    let tasks = scenes.iter().map(|scene| {
        let slots = Arc::clone(&slots);
        let target = scratch.join(format!("scene_{}.png", scene.index));
        async move {
            let _permit = slots
                .acquire()
                .await
                .map_err(|_| WorkerError::job_failed("Image slots closed"))?;

            let prompt = build_image_prompt(scene);
            debug!(scene = scene.index, "Generating scene image");
            let origin = images.generate_image(&prompt, &target).await?;

            let finished = done.fetch_add(1, Ordering::SeqCst) + 1;
            on_done(finished);

            Ok::<_, WorkerError>((SceneAsset::for_scene(scene, target), origin))
        }
    });

    let mut assets = Vec::with_capacity(scenes.len());
    let mut fallback_count = 0;
    for result in join_all(tasks).await {
        let (asset, origin) = result?;
        if origin == AssetOrigin::Fallback {
            fallback_count += 1;
        }
        assets.push(asset);
    }

    Ok(SceneAssets {
        assets,
        fallback_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use slidecast_providers::ProviderResult;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;

    struct CountingGenerator {
        active: AtomicUsize,
        peak: AtomicUsize,
        origin: AssetOrigin,
    }

    impl CountingGenerator {
        fn new(origin: AssetOrigin) -> Self {
            Self {
                active: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                origin,
            }
        }
    }

    #[async_trait]
    impl ImageGenerator for CountingGenerator {
        async fn generate_image(&self, _prompt: &str, target: &Path) -> ProviderResult<AssetOrigin> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            tokio::fs::write(target, b"png").await?;
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(self.origin)
        }
    }

    fn make_scenes(n: usize) -> Vec<Scene> {
        (0..n)
            .map(|i| {
                let start = i as f64 * 3.0;
                Scene::new(i, start, start + 3.0, format!("Text {}", i), "Visual").unwrap()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_assets_keep_scene_order() {
        let dir = TempDir::new().unwrap();
        let scenes = make_scenes(6);
        let generator = CountingGenerator::new(AssetOrigin::Generated);
        let reported = Mutex::new(Vec::new());

        let outcome = generate_scene_assets(
            &scenes,
            &generator,
            dir.path(),
            Arc::new(Semaphore::new(2)),
            |done| reported.lock().unwrap().push(done),
        )
        .await
        .unwrap();

        assert_eq!(outcome.assets.len(), 6);
        assert_eq!(outcome.fallback_count, 0);
        for (i, asset) in outcome.assets.iter().enumerate() {
            assert_eq!(asset.scene_index, i);
            assert_eq!(asset.duration, 3.0);
            assert!(asset.image.ends_with(format!("scene_{}.png", i)));
            assert!(asset.image.exists());
        }

        let mut reported = reported.into_inner().unwrap();
        reported.sort_unstable();
        assert_eq!(reported, vec![1, 2, 3, 4, 5, 6]);
        assert!(generator.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_fallbacks_are_counted() {
        let dir = TempDir::new().unwrap();
        let scenes = make_scenes(3);
        let generator = CountingGenerator::new(AssetOrigin::Fallback);

        let outcome = generate_scene_assets(
            &scenes,
            &generator,
            dir.path(),
            Arc::new(Semaphore::new(4)),
            |_| {},
        )
        .await
        .unwrap();

        assert_eq!(outcome.assets.len(), 3);
        assert_eq!(outcome.fallback_count, 3);
    }
}
