//! Export summary and reporting

use crate::core::retrieval::{FileOutcome, RetrievalOutcome};
use crate::domain::ids::JobId;
use crate::domain::JobState;
use std::time::Duration;

/// Summary of a completed export run
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Job that was created
    pub job_id: JobId,

    /// Terminal state reported by the API
    pub final_state: JobState,

    /// Status requests made
    pub poll_attempts: u32,

    /// Time spent sleeping between status requests
    pub waited: Duration,

    /// Per-file retrieval results
    pub retrieval: RetrievalOutcome,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl ExportSummary {
    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// True when every report was saved and at least one existed
    pub fn is_successful(&self) -> bool {
        self.retrieval.is_complete()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            job_id = %self.job_id,
            state = %self.final_state,
            poll_attempts = self.poll_attempts,
            files_total = self.retrieval.files.len(),
            files_saved = self.retrieval.saved_count(),
            files_failed = self.retrieval.failed_count(),
            duration_secs = self.duration.as_secs(),
            "Export completed"
        );

        for file in &self.retrieval.files {
            if let FileOutcome::Failed { url, error } = file {
                tracing::warn!(url = %url, error = %error, "Report file failed");
            }
        }
    }
}
