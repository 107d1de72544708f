//! API handlers.
//!
//! A project is submitted as a timestamped script, accepted immediately
//! and rendered in the background. Clients poll the status endpoint for
//! progress and the final artifact path.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use slidecast_models::{Job, JobId, JobState};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Request to submit a new slideshow project.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitProjectRequest {
    /// Optional display title
    #[serde(default)]
    pub title: Option<String>,
    /// Timestamped narration script
    #[validate(length(min = 1, max = 65536, message = "Script must not be empty"))]
    pub script: String,
}

/// Response after accepting a project.
#[derive(Debug, Serialize)]
pub struct SubmitProjectResponse {
    pub job_id: JobId,
}

/// Submit a script for rendering.
///
/// Returns the job ID as soon as the job is queued. Script parsing
/// happens inside the pipeline, so a malformed script shows up as a
/// failed job rather than a rejected request.
pub async fn submit_project(
    State(state): State<AppState>,
    Json(request): Json<SubmitProjectRequest>,
) -> ApiResult<Json<SubmitProjectResponse>> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let job_id = state.orchestrator.submit(request.title, request.script);

    Ok(Json(SubmitProjectResponse { job_id }))
}

/// Snapshot of a job for status polling.
#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub job_id: JobId,
    pub state: JobState,
    pub progress: u8,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Job> for JobStatusResponse {
    fn from(job: Job) -> Self {
        Self {
            job_id: job.id,
            state: job.state,
            progress: job.progress,
            message: job.message,
            result: job.artifact.map(|p| p.display().to_string()),
            error: job.error,
        }
    }
}

/// Get the current state of a job.
pub async fn job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobStatusResponse>> {
    let id = JobId::from_string(job_id);

    let job = state
        .orchestrator
        .status(&id)
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    Ok(Json(JobStatusResponse::from(job)))
}

/// Response for a cancellation request.
#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub job_id: JobId,
    /// False when the job had already finished
    pub cancelled: bool,
}

/// Request cancellation of a job.
///
/// Cancellation is best-effort: a running pipeline stops at its next
/// stage boundary, and a job that already finished is left untouched.
pub async fn cancel_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<CancelResponse>> {
    let id = JobId::from_string(job_id);

    let cancelled = state
        .orchestrator
        .cancel(&id)
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    if cancelled {
        info!(job_id = %id, "Cancellation requested");
    }

    Ok(Json(CancelResponse {
        job_id: id,
        cancelled,
    }))
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
