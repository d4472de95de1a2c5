//! Usage export API trait definition
//!
//! [`UsageApi`] is the seam between the export pipeline and the CircleCI REST
//! API. The pipeline only ever talks to this trait, so tests can drive it
//! with a mock server or an in-memory fake.

use super::models::CreateJobPayload;
use crate::domain::ids::{JobId, OrgId};
use crate::domain::{ExportJob, Result};
use async_trait::async_trait;
use std::path::Path;

/// Operations the exporter needs from the usage export API
#[async_trait]
pub trait UsageApi: Send + Sync {
    /// Create a usage export job under `org`
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ApiError::Message`] when the API reports an
    /// error, or [`crate::domain::ApiError::MalformedResponse`] when the job
    /// id is absent or null.
    async fn create_export_job(&self, org: &OrgId, payload: &CreateJobPayload) -> Result<JobId>;

    /// Fetch the current status of a job
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ApiError::Message`] when the API reports an
    /// error, or [`crate::domain::ApiError::MalformedResponse`] when `state`
    /// is absent or null.
    async fn get_export_job(&self, org: &OrgId, job_id: &JobId) -> Result<ExportJob>;

    /// Download `url` to `dest`, returning the number of bytes written
    async fn download(&self, url: &str, dest: &Path) -> Result<u64>;
}
