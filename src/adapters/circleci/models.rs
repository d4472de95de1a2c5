//! CircleCI usage export API request and response models

use crate::domain::ids::{JobId, OrgId};
use crate::domain::{ApiError, ExportDate, ExportJob, ExportRequest, JobState};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of the job-creation request
#[derive(Debug, Clone, Serialize)]
pub struct CreateJobPayload {
    /// Normalized range start
    pub start: ExportDate,

    /// Normalized range end
    pub end: ExportDate,

    /// Every organization included in the export
    pub shared_org_ids: Vec<OrgId>,
}

impl CreateJobPayload {
    /// Builds the payload for a validated request
    pub fn from_request(request: &ExportRequest) -> Self {
        Self {
            start: request.start_date().clone(),
            end: request.end_date().clone(),
            shared_org_ids: request.organization_ids().to_vec(),
        }
    }
}

/// Response of `POST /organizations/{org}/usage_export_job`
#[derive(Debug, Deserialize)]
struct CreateJobResponse {
    #[serde(default)]
    usage_export_job_id: Option<String>,
}

/// Response of `GET /organizations/{org}/usage_export_job/{id}`
#[derive(Debug, Deserialize)]
struct JobStatusResponse {
    #[serde(default)]
    state: Option<String>,

    #[serde(default)]
    download_urls: Option<Vec<String>>,
}

/// Parses a body into a JSON object, surfacing a top-level `message` as an API error
pub(crate) fn parse_envelope(status: u16, body: &str) -> Result<Map<String, Value>, ApiError> {
    let malformed = |reason: String| ApiError::MalformedResponse {
        status,
        reason,
        raw: body.to_string(),
    };

    let value: Value = serde_json::from_str(body)
        .map_err(|e| malformed(format!("response is not valid JSON: {e}")))?;

    let Value::Object(object) = value else {
        return Err(malformed("response is not a JSON object".to_string()));
    };

    if let Some(message) = object.get("message") {
        let message = match message {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        return Err(ApiError::Message {
            message,
            raw: body.to_string(),
        });
    }

    Ok(object)
}

/// Extracts the job id from a job-creation response
pub(crate) fn parse_create_job(status: u16, body: &str) -> Result<JobId, ApiError> {
    let object = parse_envelope(status, body)?;
    let malformed = |reason: String| ApiError::MalformedResponse {
        status,
        reason,
        raw: body.to_string(),
    };

    let response: CreateJobResponse = serde_json::from_value(Value::Object(object))
        .map_err(|e| malformed(format!("unexpected job creation response: {e}")))?;

    let job_id = response
        .usage_export_job_id
        .ok_or_else(|| malformed("usage_export_job_id is missing or null".to_string()))?;

    JobId::new(job_id).map_err(malformed)
}

/// Builds an [`ExportJob`] from a status response
pub(crate) fn parse_job_status(
    job_id: &JobId,
    status: u16,
    body: &str,
) -> Result<ExportJob, ApiError> {
    let object = parse_envelope(status, body)?;
    let malformed = |reason: String| ApiError::MalformedResponse {
        status,
        reason,
        raw: body.to_string(),
    };

    let response: JobStatusResponse = serde_json::from_value(Value::Object(object))
        .map_err(|e| malformed(format!("unexpected job status response: {e}")))?;

    let state = response
        .state
        .ok_or_else(|| malformed("state is missing or null".to_string()))?;

    Ok(ExportJob {
        job_id: job_id.clone(),
        state: JobState::from_api(&state),
        download_urls: response.download_urls.unwrap_or_default(),
    })
}
