//! Pipeline orchestration.
//!
//! One job walks the fixed stage order: parse script, generate scene
//! images, synthesize narration, write subtitles, render. Stages run
//! strictly sequentially since each consumes the previous stage's full
//! output; only image generation fans out internally. Progress lands in
//! the registry at stage boundaries, and cancellation is honored
//! between stages, never mid-render.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use slidecast_jobs::JobStore;
use slidecast_models::{format_srt, parse_script, Job, JobId, JobState};
use slidecast_providers::{AssetOrigin, ImageGenerator, SpeechSynthesizer};

use crate::assets::generate_scene_assets;
use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::renderer::SlideshowRenderer;

/// Stage boundary milestones. Image generation scales from
/// `PROGRESS_IMAGES_START` up to `PROGRESS_NARRATION` with scene count.
const PROGRESS_PARSED: u8 = 5;
const PROGRESS_IMAGES_START: u8 = 10;
const PROGRESS_NARRATION: u8 = 50;
const PROGRESS_SUBTITLES: u8 = 60;
const PROGRESS_RENDERING: u8 = 70;

/// Drives slideshow jobs from script to finished video.
///
/// Owns the only mutating path into the registry for its jobs; status
/// polling reads snapshots concurrently.
pub struct Orchestrator {
    config: WorkerConfig,
    store: JobStore,
    images: Arc<dyn ImageGenerator>,
    speech: Arc<dyn SpeechSynthesizer>,
    renderer: Arc<dyn SlideshowRenderer>,
    job_slots: Arc<Semaphore>,
    image_slots: Arc<Semaphore>,
    cancels: Mutex<HashSet<JobId>>,
}

impl Orchestrator {
    /// Create an orchestrator from its collaborators.
    pub fn new(
        config: WorkerConfig,
        store: JobStore,
        images: Arc<dyn ImageGenerator>,
        speech: Arc<dyn SpeechSynthesizer>,
        renderer: Arc<dyn SlideshowRenderer>,
    ) -> Self {
        let job_slots = Arc::new(Semaphore::new(config.max_concurrent_jobs));
        let image_slots = Arc::new(Semaphore::new(config.max_image_parallel));
        Self {
            config,
            store,
            images,
            speech,
            renderer,
            job_slots,
            image_slots,
            cancels: Mutex::new(HashSet::new()),
        }
    }

    /// Accept a job and schedule its pipeline.
    ///
    /// Returns immediately with the new job's ID; the pipeline runs in
    /// a spawned task once a job slot frees up.
    pub fn submit(self: &Arc<Self>, title: Option<String>, script: String) -> JobId {
        let job = self.store.create(title);
        let id = job.id.clone();
        info!(job_id = %id, "Job submitted");

        let this = Arc::clone(self);
        let job_id = id.clone();
        tokio::spawn(async move {
            let permit = match Arc::clone(&this.job_slots).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    this.store.fail(&job_id, "Worker shutting down").ok();
                    return;
                }
            };
            let _permit = permit;
            this.execute(job_id, script).await;
        });

        id
    }

    /// Snapshot a job's current state.
    pub fn status(&self, id: &JobId) -> Option<Job> {
        self.store.snapshot(id)
    }

    /// Request cancellation of a job.
    ///
    /// Pending jobs fail immediately. Running jobs stop at the next
    /// stage boundary; a render already handed to the encoder is not
    /// interrupted. Returns `None` for unknown jobs and `Some(false)`
    /// for jobs that already finished.
    pub fn cancel(&self, id: &JobId) -> Option<bool> {
        let job = self.store.snapshot(id)?;
        if job.state.is_terminal() {
            return Some(false);
        }

        self.cancels().insert(id.clone());
        info!(job_id = %id, "Cancellation requested");

        if job.state == JobState::Pending {
            // Never started; finish it here so pollers see the outcome
            // without waiting for a job slot.
            self.store.fail(id, "Job cancelled").ok();
        }
        Some(true)
    }

    async fn execute(&self, id: JobId, script: String) {
        match self.run_pipeline(&id, &script).await {
            Ok(()) => {}
            Err(WorkerError::Cancelled) => {
                info!(job_id = %id, "Job cancelled");
                self.store.fail(&id, "Job cancelled").ok();
            }
            Err(WorkerError::Registry(e)) => {
                // The job finished through another path, e.g. a cancel
                // while it was still pending. Leave it as is.
                debug!(job_id = %id, error = %e, "Skipping registry update");
            }
            Err(e) => {
                error!(job_id = %id, error = %e, "Job failed");
                self.store.fail(&id, e.to_string()).ok();
            }
        }
        self.cancels().remove(&id);
    }

    async fn run_pipeline(&self, id: &JobId, script: &str) -> WorkerResult<()> {
        self.ensure_live(id)?;
        self.store.mark_running(id)?;

        let scratch = self.config.work_dir.join(format!("job-{}", id));
        tokio::fs::create_dir_all(&scratch).await?;

        self.store
            .set_progress(id, PROGRESS_PARSED, "Splitting script into scenes")?;
        let scenes = parse_script(script)?;
        let total = scenes.len();
        info!(job_id = %id, scenes = total, "Script parsed");

        self.ensure_live(id)?;
        self.store.set_progress(
            id,
            PROGRESS_IMAGES_START,
            format!("Generating {} scene images", total),
        )?;
        let store = self.store.clone();
        let progress_id = id.clone();
        let outcome = generate_scene_assets(
            &scenes,
            self.images.as_ref(),
            &scratch,
            Arc::clone(&self.image_slots),
            move |done| {
                let span = (PROGRESS_NARRATION - PROGRESS_IMAGES_START) as usize;
                let progress = PROGRESS_IMAGES_START as usize + span * done / total;
                let message = format!("Generated image {}/{}", done, total);
                store.set_progress(&progress_id, progress as u8, message).ok();
            },
        )
        .await?;
        if outcome.fallback_count > 0 {
            warn!(
                job_id = %id,
                fallbacks = outcome.fallback_count,
                "Some scene images fell back to placeholders"
            );
        }

        self.ensure_live(id)?;
        self.store
            .set_progress(id, PROGRESS_NARRATION, "Synthesizing narration")?;
        let narration = scratch.join("narration.mp3");
        let narration_text = scenes
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        // The final scene's end bound defines total narration length.
        let total_secs = scenes.last().map(|s| s.end).unwrap_or_default();
        let origin = self
            .speech
            .synthesize(&narration_text, &narration, total_secs)
            .await?;
        if origin == AssetOrigin::Fallback {
            debug!(job_id = %id, "Narration fell back to silence");
        }

        self.ensure_live(id)?;
        self.store
            .set_progress(id, PROGRESS_SUBTITLES, "Writing subtitles")?;
        let subtitles = scratch.join("subtitles.srt");
        tokio::fs::write(&subtitles, format_srt(&scenes)).await?;

        self.ensure_live(id)?;
        self.store
            .set_progress(id, PROGRESS_RENDERING, "Rendering video")?;
        let output = scratch.join("final_video.mp4");
        let options = self.config.render_options();
        let artifact = self
            .renderer
            .render(&outcome.assets, &narration, &subtitles, &output, &options)
            .await?;

        self.store.complete(id, artifact)?;
        info!(job_id = %id, "Job complete");
        Ok(())
    }

    /// Abort with `Cancelled` if this job was asked to stop.
    fn ensure_live(&self, id: &JobId) -> WorkerResult<()> {
        if self.cancels().contains(id) {
            return Err(WorkerError::Cancelled);
        }
        Ok(())
    }

    fn cancels(&self) -> MutexGuard<'_, HashSet<JobId>> {
        self.cancels.lock().unwrap_or_else(|e| e.into_inner())
    }
}
