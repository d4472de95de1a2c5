//! Usage export job model
//!
//! The local process never changes a job's state itself; a new [`ExportJob`]
//! is produced each time the status endpoint is polled.

use super::ids::JobId;
use std::fmt;

/// State reported by the status endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    /// Job is still running
    Processing,
    /// Job finished and produced download URLs
    Completed,
    /// Any other terminal state (`failed`, `expired`, ...)
    Other(String),
}

impl JobState {
    /// Maps the raw `state` string to a [`JobState`]
    pub fn from_api(state: &str) -> Self {
        match state {
            "processing" => JobState::Processing,
            "completed" => JobState::Completed,
            other => JobState::Other(other.to_string()),
        }
    }

    /// Whether polling should stop
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobState::Processing)
    }

    /// The raw state string
    pub fn as_str(&self) -> &str {
        match self {
            JobState::Processing => "processing",
            JobState::Completed => "completed",
            JobState::Other(state) => state,
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a usage export job
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Job identifier
    pub job_id: JobId,

    /// Current state
    pub state: JobState,

    /// Report URLs, in the order returned; only populated once completed
    pub download_urls: Vec<String>,
}
