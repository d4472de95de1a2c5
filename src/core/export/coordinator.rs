//! Export coordinator - main orchestrator for the export process
//!
//! Runs the pipeline for one [`ExportRequest`]: create the output directory,
//! submit the job, poll it to a terminal state and retrieve the reports.

use crate::adapters::circleci::{CircleCiClient, CreateJobPayload, UsageApi};
use crate::config::UsageExportConfig;
use crate::core::export::summary::ExportSummary;
use crate::core::polling::{JobPoller, PollPolicy, Sleeper, TokioSleeper};
use crate::core::retrieval::ReportRetriever;
use crate::domain::{ExportRequest, JobError, JobState, Result};
use std::sync::Arc;
use std::time::Instant;

/// Export coordinator
pub struct ExportCoordinator {
    api: Arc<dyn UsageApi>,
    sleeper: Arc<dyn Sleeper>,
    policy: PollPolicy,
    combine_parts: bool,
}

impl ExportCoordinator {
    /// Create a coordinator talking to the CircleCI API
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &UsageExportConfig, request: &ExportRequest) -> Result<Self> {
        let client = CircleCiClient::new(&config.api, request.api_token().clone())?;

        Ok(Self::with_components(
            Arc::new(client),
            Arc::new(TokioSleeper),
            PollPolicy::from_config(&config.polling),
            config.output.combine_parts,
        ))
    }

    /// Create a coordinator from explicit parts
    pub fn with_components(
        api: Arc<dyn UsageApi>,
        sleeper: Arc<dyn Sleeper>,
        policy: PollPolicy,
        combine_parts: bool,
    ) -> Self {
        Self {
            api,
            sleeper,
            policy,
            combine_parts,
        }
    }

    /// Execute the export
    ///
    /// Per-file download failures are reported in the summary rather than
    /// returned as errors.
    ///
    /// # Errors
    ///
    /// - I/O error if the output directory cannot be created
    /// - API errors from job creation or status requests
    /// - [`JobError::Failed`] when the job ends in a state other than `completed`
    /// - [`JobError::TimedOut`] when the job is still processing after the last attempt
    pub async fn execute_export(&self, request: &ExportRequest) -> Result<ExportSummary> {
        let started = Instant::now();
        let home_org = request.home_org();

        tokio::fs::create_dir_all(request.output_dir()).await?;

        let payload = CreateJobPayload::from_request(request);
        tracing::info!(
            home_org = %home_org,
            org_count = request.organization_ids().len(),
            start = %request.start_date(),
            end = %request.end_date(),
            "Submitting usage export job"
        );
        let job_id = self.api.create_export_job(home_org, &payload).await?;

        tracing::info!(
            job_id = %job_id,
            max_attempts = self.policy.max_attempts,
            interval_secs = self.policy.interval.as_secs(),
            max_wait_secs = self.policy.max_wait().as_secs(),
            "Waiting for export job"
        );
        let outcome = JobPoller::new(self.api.as_ref(), self.sleeper.as_ref(), &self.policy)
            .wait_for_terminal(home_org, &job_id)
            .await?;

        if outcome.job.state != JobState::Completed {
            return Err(JobError::Failed {
                job_id: job_id.to_string(),
                state: outcome.job.state.to_string(),
            }
            .into());
        }

        let retrieval = ReportRetriever::new(self.api.as_ref(), self.combine_parts)
            .retrieve(
                &outcome.job.download_urls,
                request.output_dir(),
                &request.report_base_name(),
            )
            .await;

        let summary = ExportSummary {
            job_id,
            final_state: outcome.job.state,
            poll_attempts: outcome.state.attempts,
            waited: outcome.state.waited,
            retrieval,
            duration: Default::default(),
        }
        .with_duration(started.elapsed());

        summary.log_summary();
        Ok(summary)
    }
}
