//! Registry error types.

use thiserror::Error;

use slidecast_models::{JobId, JobState};

pub type JobsResult<T> = Result<T, JobsError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobsError {
    #[error("Unknown job: {0}")]
    UnknownJob(JobId),

    #[error("Job {id} already finished as {state}")]
    TerminalState { id: JobId, state: JobState },
}
