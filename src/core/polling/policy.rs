//! Poll policy and sleeping abstraction
//!
//! The delay between status requests goes through [`Sleeper`] so tests can
//! count and sum the waits instead of actually sleeping.

use crate::config::PollingConfig;
use async_trait::async_trait;
use std::time::Duration;

/// Fixed-delay polling policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Status requests made before giving up; at least 1
    pub max_attempts: u32,

    /// Delay between consecutive status requests
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            interval: Duration::from_secs(30),
        }
    }
}

impl PollPolicy {
    /// Builds a policy from the `[polling]` config section
    pub fn from_config(config: &PollingConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            interval: Duration::from_secs(config.interval_seconds),
        }
    }

    /// Longest total wait before a timeout: one interval between each pair of attempts
    pub fn max_wait(&self) -> Duration {
        self.interval * self.max_attempts.saturating_sub(1)
    }
}

/// Suspends the poll loop between attempts
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the Tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
