//! CircleCI REST client
//!
//! Implements [`UsageApi`] on top of `reqwest`. Requests to the CircleCI API
//! carry the `Circle-Token` header; report downloads go to pre-signed URLs
//! and are sent without it.

use super::api::UsageApi;
use super::models::{parse_create_job, parse_job_status, CreateJobPayload};
use crate::config::{ApiConfig, SecretString};
use crate::domain::ids::{JobId, OrgId};
use crate::domain::{ApiError, ExportJob, Result, UsageExportError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder};
use secrecy::ExposeSecret;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

const TOKEN_HEADER: &str = "Circle-Token";

/// CircleCI usage export client
///
/// # Example
///
/// ```no_run
/// use usage_export::adapters::circleci::CircleCiClient;
/// use usage_export::config::{secret_string, ApiConfig};
///
/// # fn example() -> usage_export::domain::Result<()> {
/// let client = CircleCiClient::new(&ApiConfig::default(), secret_string("token".to_string()))?;
/// # Ok(())
/// # }
/// ```
pub struct CircleCiClient {
    /// Base URL without a trailing slash
    base_url: String,

    /// HTTP client for making requests
    client: Client,

    /// API token sent as `Circle-Token`
    token: SecretString,
}

impl CircleCiClient {
    /// Create a new client from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig, token: SecretString) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(config.timeout())
            .connect_timeout(Duration::from_secs(30))
            .user_agent(concat!("usage-export/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                UsageExportError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            token,
        })
    }

    fn jobs_url(&self, org: &OrgId) -> String {
        format!("{}/organizations/{}/usage_export_job", self.base_url, org)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(TOKEN_HEADER, self.token.expose_secret().as_ref())
            .header("Accept", "application/json")
    }

    /// Sends a request and returns the status code with the raw body
    async fn send(&self, request: RequestBuilder) -> Result<(u16, String)> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::ConnectionFailed(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::ConnectionFailed(format!("Failed to read response: {e}")))?;

        tracing::debug!(status, body = %body, "CircleCI API response");
        Ok((status, body))
    }
}

#[async_trait]
impl UsageApi for CircleCiClient {
    async fn create_export_job(&self, org: &OrgId, payload: &CreateJobPayload) -> Result<JobId> {
        let url = self.jobs_url(org);
        tracing::info!(org_id = %org, url = %url, "Creating usage export job");

        let (status, body) = self
            .send(self.authorized(self.client.post(&url)).json(payload))
            .await?;

        let job_id = parse_create_job(status, &body)?;
        tracing::info!(org_id = %org, job_id = %job_id, "Usage export job created");
        Ok(job_id)
    }

    async fn get_export_job(&self, org: &OrgId, job_id: &JobId) -> Result<ExportJob> {
        let url = format!("{}/{}", self.jobs_url(org), job_id);

        let (status, body) = self.send(self.authorized(self.client.get(&url))).await?;

        Ok(parse_job_status(job_id, status, &body)?)
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| UsageExportError::Download(format!("Request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UsageExportError::Download(format!(
                "Download of {url} failed with status {status}"
            )));
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0u64;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| UsageExportError::Download(format!("Reading {url} failed: {e}")))?
        {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        tracing::debug!(url = %url, dest = %dest.display(), bytes = written, "Download finished");
        Ok(written)
    }
}
