//! In-memory job registry.
//!
//! Jobs live in a shared map for the lifetime of the process. The API
//! layer reads snapshots while the worker holds the only mutating path,
//! so a plain `std::sync::RwLock` is enough; no await happens under the
//! lock.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use slidecast_models::{Job, JobId};

use crate::error::{JobsError, JobsResult};

/// Shared registry of jobs keyed by ID.
///
/// Cloning is cheap and hands out another handle to the same map.
#[derive(Clone, Default)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<JobId, Job>>>,
}

impl JobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new pending job and return a snapshot of it.
    pub fn create(&self, title: Option<String>) -> Job {
        let job = Job::new(title);
        self.write_jobs().insert(job.id.clone(), job.clone());
        debug!(job_id = %job.id, "Registered job");
        job
    }

    /// Transition a job to running.
    pub fn mark_running(&self, id: &JobId) -> JobsResult<()> {
        self.update(id, |job| job.start())?;
        info!(job_id = %id, "Job running");
        Ok(())
    }

    /// Record pipeline progress.
    ///
    /// Progress never moves backwards and never exceeds 100; the job
    /// model clamps both.
    pub fn set_progress(
        &self,
        id: &JobId,
        progress: u8,
        message: impl Into<String>,
    ) -> JobsResult<()> {
        self.update(id, |job| job.set_progress(progress, message))
    }

    /// Finish a job successfully with its output artifact.
    pub fn complete(&self, id: &JobId, artifact: PathBuf) -> JobsResult<()> {
        self.update(id, |job| job.complete(artifact))?;
        info!(job_id = %id, "Job succeeded");
        Ok(())
    }

    /// Finish a job with an error.
    pub fn fail(&self, id: &JobId, error: impl Into<String>) -> JobsResult<()> {
        let error = error.into();
        self.update(id, |job| job.fail(error.clone()))?;
        warn!(job_id = %id, error = %error, "Job failed");
        Ok(())
    }

    /// Clone the current state of a job, if known.
    pub fn snapshot(&self, id: &JobId) -> Option<Job> {
        self.read_jobs().get(id).cloned()
    }

    /// Number of registered jobs.
    pub fn len(&self) -> usize {
        self.read_jobs().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_jobs().is_empty()
    }

    /// Apply a mutation to a live job.
    ///
    /// Unknown IDs and jobs already in a terminal state are rejected, so
    /// a late pipeline update can never overwrite a finished job.
    fn update<F>(&self, id: &JobId, apply: F) -> JobsResult<()>
    where
        F: FnOnce(&mut Job),
    {
        let mut jobs = self.write_jobs();
        let Some(job) = jobs.get_mut(id) else {
            return Err(JobsError::UnknownJob(id.clone()));
        };
        if job.state.is_terminal() {
            return Err(JobsError::TerminalState {
                id: id.clone(),
                state: job.state,
            });
        }
        apply(job);
        Ok(())
    }

    // A poisoned lock only means some writer panicked mid-update; the
    // map itself is still usable, so recover the guard.
    fn read_jobs(&self) -> RwLockReadGuard<'_, HashMap<JobId, Job>> {
        self.jobs.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_jobs(&self) -> RwLockWriteGuard<'_, HashMap<JobId, Job>> {
        self.jobs.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidecast_models::JobState;

    #[test]
    fn test_create_registers_pending_job() {
        let store = JobStore::new();
        let job = store.create(Some("My Video".to_string()));

        let snap = store.snapshot(&job.id).unwrap();
        assert_eq!(snap.state, JobState::Pending);
        assert_eq!(snap.progress, 0);
        assert_eq!(snap.message, "Queued");
        assert_eq!(snap.title.as_deref(), Some("My Video"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_full_lifecycle() {
        let store = JobStore::new();
        let job = store.create(None);

        store.mark_running(&job.id).unwrap();
        store.set_progress(&job.id, 50, "Halfway").unwrap();
        store
            .complete(&job.id, PathBuf::from("/tmp/final_video.mp4"))
            .unwrap();

        let snap = store.snapshot(&job.id).unwrap();
        assert_eq!(snap.state, JobState::Succeeded);
        assert_eq!(snap.progress, 100);
        assert_eq!(snap.artifact, Some(PathBuf::from("/tmp/final_video.mp4")));
        assert!(snap.finished_at.is_some());
    }

    #[test]
    fn test_progress_is_monotonic() {
        let store = JobStore::new();
        let job = store.create(None);
        store.mark_running(&job.id).unwrap();

        store.set_progress(&job.id, 40, "Images").unwrap();
        store.set_progress(&job.id, 20, "Stale update").unwrap();

        let snap = store.snapshot(&job.id).unwrap();
        assert_eq!(snap.progress, 40);
        // The message still reflects the latest report.
        assert_eq!(snap.message, "Stale update");
    }

    #[test]
    fn test_progress_clamped_to_hundred() {
        let store = JobStore::new();
        let job = store.create(None);
        store.mark_running(&job.id).unwrap();

        store.set_progress(&job.id, 250, "Overshoot").unwrap();

        assert_eq!(store.snapshot(&job.id).unwrap().progress, 100);
    }

    #[test]
    fn test_terminal_jobs_reject_updates() {
        let store = JobStore::new();
        let job = store.create(None);
        store.mark_running(&job.id).unwrap();
        store.fail(&job.id, "ffmpeg exploded").unwrap();

        let err = store.set_progress(&job.id, 80, "Late").unwrap_err();
        assert!(matches!(err, JobsError::TerminalState { state, .. } if state == JobState::Failed));

        let snap = store.snapshot(&job.id).unwrap();
        assert_eq!(snap.error.as_deref(), Some("ffmpeg exploded"));
    }

    #[test]
    fn test_unknown_job() {
        let store = JobStore::new();
        let id = JobId::new();

        assert!(store.snapshot(&id).is_none());
        assert_eq!(
            store.mark_running(&id).unwrap_err(),
            JobsError::UnknownJob(id)
        );
    }
}
