//! Job status polling loop
//!
//! `processing` is the only non-terminal state. Every other state ends the
//! loop immediately, whatever the attempt count. An API `message` or a
//! missing `state` aborts without further attempts.

use super::policy::{PollPolicy, Sleeper};
use crate::adapters::circleci::UsageApi;
use crate::domain::ids::{JobId, OrgId};
use crate::domain::{ExportJob, JobError, Result};
use crate::log_poll_attempt;
use std::time::Duration;

/// Progress threaded through the poll loop
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollState {
    /// Status requests made so far
    pub attempts: u32,

    /// Total time spent sleeping between requests
    pub waited: Duration,
}

/// Result of a poll loop that reached a terminal state
#[derive(Debug, Clone)]
pub struct PollOutcome {
    /// Last job snapshot; its state is terminal
    pub job: ExportJob,

    /// Final loop progress
    pub state: PollState,
}

/// Polls a job until it leaves `processing`
pub struct JobPoller<'a> {
    api: &'a dyn UsageApi,
    sleeper: &'a dyn Sleeper,
    policy: &'a PollPolicy,
}

impl<'a> JobPoller<'a> {
    /// Create a poller
    pub fn new(api: &'a dyn UsageApi, sleeper: &'a dyn Sleeper, policy: &'a PollPolicy) -> Self {
        Self {
            api,
            sleeper,
            policy,
        }
    }

    /// Poll `job_id` under `org` until a terminal state
    ///
    /// # Errors
    ///
    /// - API and malformed-response errors from the status call, unretried
    /// - [`JobError::TimedOut`] when the job is still processing after
    ///   `max_attempts` requests
    pub async fn wait_for_terminal(&self, org: &OrgId, job_id: &JobId) -> Result<PollOutcome> {
        let mut state = PollState::default();

        loop {
            state.attempts += 1;
            let job = self.api.get_export_job(org, job_id).await?;
            log_poll_attempt!(state.attempts, self.policy.max_attempts, job.state);

            if job.state.is_terminal() {
                tracing::info!(
                    job_id = %job_id,
                    state = %job.state,
                    attempts = state.attempts,
                    "Export job reached terminal state"
                );
                return Ok(PollOutcome { job, state });
            }

            if state.attempts >= self.policy.max_attempts {
                tracing::error!(
                    job_id = %job_id,
                    attempts = state.attempts,
                    waited_secs = state.waited.as_secs(),
                    "Export job still processing, giving up"
                );
                return Err(JobError::TimedOut {
                    job_id: job_id.to_string(),
                    attempts: state.attempts,
                }
                .into());
            }

            tracing::info!(
                job_id = %job_id,
                delay_secs = self.policy.interval.as_secs(),
                "Export job still processing"
            );
            self.sleeper.sleep(self.policy.interval).await;
            state.waited += self.policy.interval;
        }
    }
}
