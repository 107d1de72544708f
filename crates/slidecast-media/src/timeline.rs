//! Timeline composition: chained cross-fades over scene stills.
//!
//! Each scene image becomes a looped input clipped to its scene's
//! duration, normalized to the output frame, and folded into the
//! running timeline with `xfade`. Subtitles are burned in at the end of
//! the chain and a single encoder pass writes the final video.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use slidecast_models::{EncodingConfig, SceneAsset};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::graph::{FilterGraph, FilterOp, FilterStep, StreamLabel, TransitionKind};
use crate::probe::probe_duration;

/// Drift beyond this between narration and timeline gets a warning.
const SYNC_WARN_TOLERANCE_SECS: f64 = 1.0;

/// Options for slideshow composition.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Output frame width
    pub width: u32,
    /// Output frame height
    pub height: u32,
    /// Cross-fade length in seconds
    pub transition_secs: f64,
    /// Cross-fade style
    pub transition: TransitionKind,
    /// Encoder settings
    pub encoding: EncodingConfig,
    /// Encoder timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            transition_secs: 0.5,
            transition: TransitionKind::Fade,
            encoding: EncodingConfig::default(),
            timeout_secs: 600,
        }
    }
}

/// Total duration of the composited timeline.
///
/// Each cross-fade overlaps two neighbors, so n scenes lose (n-1)
/// transition lengths: `sum(d) - (n-1) * transition`.
pub fn timeline_duration(durations: &[f64], transition_secs: f64) -> f64 {
    if durations.is_empty() {
        return 0.0;
    }
    let total: f64 = durations.iter().sum();
    total - (durations.len() as f64 - 1.0) * transition_secs
}

/// Build the cross-fade graph over the given scene durations.
///
/// Returns the graph and the label of the folded chain's output. Each
/// input `i:v` is normalized to the target frame as `v{i}`, then folded
/// left with `xfade`. A fade's offset is the length of the running
/// timeline minus the transition, i.e. the fade begins just before the
/// composited stream would otherwise end.
pub fn build_timeline_graph(
    durations: &[f64],
    opts: &RenderOptions,
) -> (FilterGraph, StreamLabel) {
    let mut graph = FilterGraph::new();

    for i in 0..durations.len() {
        graph.push(FilterStep::new(
            vec![StreamLabel::input_video(i)],
            vec![
                FilterOp::Scale {
                    width: opts.width,
                    height: opts.height,
                },
                FilterOp::SetSar,
            ],
            StreamLabel::new(format!("v{}", i)),
        ));
    }

    let mut current = StreamLabel::new("v0");
    if durations.len() < 2 {
        return (graph, current);
    }

    // Left fold in scene order. The accumulator tracks the composited
    // length so far; each step extends it by the next scene minus the
    // fade overlap.
    let mut running_total = durations[0];

    for (i, duration) in durations.iter().enumerate().skip(1) {
        let offset = running_total - opts.transition_secs;
        let output = StreamLabel::new(format!("vt{}", i));

        graph.push(FilterStep::new(
            vec![current, StreamLabel::new(format!("v{}", i))],
            vec![FilterOp::Xfade {
                transition: opts.transition,
                duration: opts.transition_secs,
                offset,
            }],
            output.clone(),
        ));

        running_total += duration - opts.transition_secs;
        current = output;
    }

    (graph, current)
}

/// Composite scene stills and a narration track into the final video.
///
/// Preconditions are guarded here independent of upstream validation:
/// an empty asset list and non-positive durations are errors, reported
/// before any process is spawned. Narration length is checked against
/// the timeline as an advisory only; `-shortest` handles real drift.
pub async fn compose_slideshow(
    assets: &[SceneAsset],
    narration: &Path,
    subtitles: &Path,
    output: &Path,
    opts: &RenderOptions,
) -> MediaResult<PathBuf> {
    if assets.is_empty() {
        return Err(MediaError::NoAssets);
    }
    for asset in assets {
        if asset.duration <= 0.0 {
            return Err(MediaError::InvalidAssetDuration {
                index: asset.scene_index,
                duration: asset.duration,
            });
        }
    }

    let durations: Vec<f64> = assets.iter().map(|a| a.duration).collect();
    let expected = timeline_duration(&durations, opts.transition_secs);

    match probe_duration(narration).await {
        Ok(audio_secs) => {
            if (audio_secs - expected).abs() > SYNC_WARN_TOLERANCE_SECS {
                warn!(
                    timeline_secs = expected,
                    narration_secs = audio_secs,
                    "Narration and timeline lengths differ"
                );
            }
        }
        Err(e) => debug!("Skipping narration length check: {}", e),
    }

    let (mut graph, chain_out) = build_timeline_graph(&durations, opts);
    graph.push(FilterStep::new(
        vec![chain_out],
        vec![
            FilterOp::Subtitles {
                path: subtitles.to_path_buf(),
            },
            FilterOp::Format {
                pix_fmt: "yuv420p".to_string(),
            },
        ],
        StreamLabel::new("vout"),
    ));

    let mut cmd = FfmpegCommand::new(output);
    for asset in assets {
        cmd = cmd.looped_image(&asset.image, asset.duration);
    }
    let narration_index = cmd.input_count();
    let cmd = cmd
        .input(narration)
        .filter_complex(graph.render())
        .map("[vout]")
        .map(format!("{}:a", narration_index))
        .output_args(opts.encoding.to_ffmpeg_args())
        .shortest();

    info!(
        scenes = assets.len(),
        timeline_secs = expected,
        output = %output.display(),
        "Compositing slideshow"
    );

    FfmpegRunner::new()
        .with_timeout(opts.timeout_secs)
        .run(&cmd)
        .await?;

    Ok(output.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidecast_models::Scene;
    use tempfile::TempDir;
    use tokio_test::assert_ok;

    fn asset(index: usize, duration: f64) -> SceneAsset {
        SceneAsset {
            scene_index: index,
            image: PathBuf::from(format!("/tmp/scene_{}.png", index)),
            duration,
        }
    }

    #[test]
    fn test_timeline_duration() {
        assert_eq!(timeline_duration(&[], 0.5), 0.0);
        assert!((timeline_duration(&[4.0], 0.5) - 4.0).abs() < 1e-9);
        assert!((timeline_duration(&[3.0, 3.0], 0.5) - 5.5).abs() < 1e-9);
        assert!((timeline_duration(&[3.0, 4.0, 5.0], 0.5) - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_scene_graph_has_no_xfade() {
        let opts = RenderOptions::default();
        let (graph, label) = build_timeline_graph(&[4.0], &opts);

        assert_eq!(label.as_str(), "v0");
        assert_eq!(graph.render(), "[0:v]scale=1080:1920,setsar=1[v0]");
    }

    #[test]
    fn test_fold_offsets_track_running_total() {
        let opts = RenderOptions::default();
        let (graph, label) = build_timeline_graph(&[3.0, 4.0, 5.0], &opts);

        assert_eq!(label.as_str(), "vt2");
        assert_eq!(
            graph.render(),
            "[0:v]scale=1080:1920,setsar=1[v0];\
             [1:v]scale=1080:1920,setsar=1[v1];\
             [2:v]scale=1080:1920,setsar=1[v2];\
             [v0][v1]xfade=transition=fade:duration=0.500:offset=2.500[vt1];\
             [vt1][v2]xfade=transition=fade:duration=0.500:offset=6.000[vt2]"
        );
    }

    #[test]
    fn test_last_fade_ends_at_timeline_end() {
        // The final offset plus the transition must land exactly on the
        // composited total for any chain length.
        let opts = RenderOptions::default();
        let durations = [3.0, 2.0, 4.0, 2.5];

        let (graph, _) = build_timeline_graph(&durations, &opts);
        let last = graph.steps().last().unwrap();
        let FilterOp::Xfade { offset, .. } = &last.ops[0] else {
            panic!("last step should be a cross-fade");
        };

        let total = timeline_duration(&durations, opts.transition_secs);
        assert!((*offset + opts.transition_secs - total).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_compose_rejects_empty_assets() {
        let result = compose_slideshow(
            &[],
            Path::new("/tmp/narration.mp3"),
            Path::new("/tmp/subtitles.srt"),
            Path::new("/tmp/out.mp4"),
            &RenderOptions::default(),
        )
        .await;

        assert!(matches!(result, Err(MediaError::NoAssets)));
    }

    #[tokio::test]
    async fn test_compose_rejects_non_positive_duration() {
        let result = compose_slideshow(
            &[asset(0, 3.0), asset(1, 0.0)],
            Path::new("/tmp/narration.mp3"),
            Path::new("/tmp/subtitles.srt"),
            Path::new("/tmp/out.mp4"),
            &RenderOptions::default(),
        )
        .await;

        assert!(matches!(
            result,
            Err(MediaError::InvalidAssetDuration { index: 1, .. })
        ));
    }

    async fn write_test_image(path: &Path) {
        let cmd = FfmpegCommand::new(path)
            .input_with_args(
                ["-f".to_string(), "lavfi".to_string()],
                "color=c=steelblue:s=320x568:d=1",
            )
            .output_arg("-frames:v")
            .output_arg("1");
        assert_ok!(FfmpegRunner::new().with_timeout(30).run(&cmd).await);
    }

    #[tokio::test]
    #[ignore = "requires ffmpeg with libass"]
    async fn test_compose_two_scene_slideshow() {
        let dir = TempDir::new().unwrap();

        let scenes = vec![
            Scene::new(0, 0.0, 2.0, "Hello", "A blue card").unwrap(),
            Scene::new(1, 2.0, 4.0, "World", "Another card").unwrap(),
        ];

        let mut assets = Vec::new();
        for scene in &scenes {
            let image = dir.path().join(format!("scene_{}.png", scene.index));
            write_test_image(&image).await;
            assets.push(SceneAsset::for_scene(scene, image));
        }

        let narration = dir.path().join("narration.mp3");
        crate::audio::write_silence(&narration, 3.5).await.unwrap();

        let subtitles = dir.path().join("subtitles.srt");
        tokio::fs::write(&subtitles, slidecast_models::format_srt(&scenes))
            .await
            .unwrap();

        let output = dir.path().join("final_video.mp4");
        let opts = RenderOptions {
            width: 320,
            height: 568,
            ..Default::default()
        };

        let rendered = compose_slideshow(&assets, &narration, &subtitles, &output, &opts)
            .await
            .unwrap();

        assert!(rendered.exists());
        let probed = probe_duration(&rendered).await.unwrap();
        // 2s + 2s scenes with one 0.5s fade
        assert!((probed - 3.5).abs() < 0.5, "unexpected duration {}", probed);
    }
}
