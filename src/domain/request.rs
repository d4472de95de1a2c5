//! Export request model
//!
//! [`ExportInput`] holds whatever the operator supplied, merged from flags,
//! environment and defaults. [`ExportInput::into_request`] validates it into
//! an immutable [`ExportRequest`] that the rest of the pipeline consumes.

use super::dates::{DateBound, ExportDate};
use super::errors::UsageExportError;
use super::ids::{parse_org_ids, OrgId};
use super::result::Result;
use crate::config::SecretString;
use secrecy::ExposeSecret;
use std::path::PathBuf;

/// Unvalidated export input
#[derive(Debug, Default)]
pub struct ExportInput {
    /// Comma-separated organization IDs
    pub org_ids: Option<String>,

    /// API token
    pub token: Option<SecretString>,

    /// Range start as typed by the operator
    pub start: Option<String>,

    /// Range end as typed by the operator
    pub end: Option<String>,

    /// Output directory
    pub output_dir: PathBuf,

    /// Debug output enabled
    pub debug: bool,
}

impl ExportInput {
    /// Names of required fields that are absent or blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let blank = |value: &Option<String>| value.as_deref().map_or(true, |v| v.trim().is_empty());

        let mut missing = Vec::new();
        if blank(&self.org_ids) {
            missing.push("org_id");
        }
        if self
            .token
            .as_ref()
            .map_or(true, |t| t.expose_secret().is_empty())
        {
            missing.push("token");
        }
        if blank(&self.start) {
            missing.push("start");
        }
        if blank(&self.end) {
            missing.push("end");
        }
        missing
    }

    /// Validates and normalizes the input
    ///
    /// # Errors
    ///
    /// Returns [`UsageExportError::Validation`] when a required field is
    /// missing, a date is malformed, no organization ID survives parsing, or
    /// the range ends before it starts.
    pub fn into_request(self) -> Result<ExportRequest> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(UsageExportError::Validation(format!(
                "Missing required arguments: {}",
                missing.join(", ")
            )));
        }

        let (Some(org_ids), Some(api_token), Some(start), Some(end)) =
            (self.org_ids, self.token, self.start, self.end)
        else {
            return Err(UsageExportError::Validation(
                "Missing required arguments".to_string(),
            ));
        };

        let organization_ids = parse_org_ids(&org_ids).map_err(UsageExportError::Validation)?;
        let start_date = ExportDate::parse(&start, DateBound::Start)?;
        let end_date = ExportDate::parse(&end, DateBound::End)?;

        ExportRequest::new(
            organization_ids,
            api_token,
            start_date,
            end_date,
            self.output_dir,
            self.debug,
        )
    }
}

/// A validated usage export request
#[derive(Debug)]
pub struct ExportRequest {
    organization_ids: Vec<OrgId>,
    api_token: SecretString,
    start_date: ExportDate,
    end_date: ExportDate,
    output_dir: PathBuf,
    debug: bool,
}

impl ExportRequest {
    /// Creates a request, checking the org list and date range
    pub fn new(
        organization_ids: Vec<OrgId>,
        api_token: SecretString,
        start_date: ExportDate,
        end_date: ExportDate,
        output_dir: PathBuf,
        debug: bool,
    ) -> Result<Self> {
        if organization_ids.is_empty() {
            return Err(UsageExportError::Validation(
                "At least one organization ID is required".to_string(),
            ));
        }
        if start_date > end_date {
            return Err(UsageExportError::Validation(format!(
                "Start date {start_date} is after end date {end_date}"
            )));
        }

        Ok(Self {
            organization_ids,
            api_token,
            start_date,
            end_date,
            output_dir,
            debug,
        })
    }

    /// The organization the job is created under
    pub fn home_org(&self) -> &OrgId {
        &self.organization_ids[0]
    }

    /// All organizations included in the export, in input order
    pub fn organization_ids(&self) -> &[OrgId] {
        &self.organization_ids
    }

    /// API token
    pub fn api_token(&self) -> &SecretString {
        &self.api_token
    }

    /// Normalized range start
    pub fn start_date(&self) -> &ExportDate {
        &self.start_date
    }

    /// Normalized range end
    pub fn end_date(&self) -> &ExportDate {
        &self.end_date
    }

    /// Directory report files are written to
    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    /// Whether raw API responses should be shown
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Report file name stem, e.g. `usage_report_2024-01-01_to_2024-01-31_org-a_org-b`
    pub fn report_base_name(&self) -> String {
        let orgs: Vec<&str> = self.organization_ids.iter().map(OrgId::as_str).collect();
        format!(
            "usage_report_{}_to_{}_{}",
            self.start_date.date_part(),
            self.end_date.date_part(),
            orgs.join("_")
        )
    }
}
