//! Domain identifier types with validation
//!
//! Newtype wrappers for CircleCI identifiers so an org id can never be passed
//! where a job id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Organization identifier newtype wrapper
///
/// The identifier becomes both a URL path segment and part of the report
/// file name, so whitespace, path separators, `?`, `#` and the dot segments
/// `.` and `..` are rejected.
///
/// # Examples
///
/// ```
/// use usage_export::domain::ids::OrgId;
/// use std::str::FromStr;
///
/// let org = OrgId::from_str("1a2b3c4d-0000-4bad-97dc-d78268e01398").unwrap();
/// assert_eq!(org.as_str(), "1a2b3c4d-0000-4bad-97dc-d78268e01398");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrgId(String);

impl OrgId {
    /// Creates a new OrgId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.is_empty() {
            return Err("Organization ID cannot be empty".to_string());
        }
        if id.chars().any(char::is_whitespace) {
            return Err(format!("Organization ID cannot contain whitespace: '{id}'"));
        }
        if id.contains(['/', '\\', '?', '#']) || id == "." || id == ".." {
            return Err(format!(
                "Organization ID cannot contain path or URL separators: '{id}'"
            ));
        }
        Ok(Self(id))
    }

    /// Returns the org ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrgId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for OrgId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Usage export job identifier, as returned by the job-creation call
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Creates a new JobId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Job ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the job ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Parses a comma-separated list of organization IDs
///
/// All whitespace is stripped, including whitespace inside a token, and
/// empty tokens are dropped. Order is preserved.
///
/// # Errors
///
/// Returns the first token that is not a valid [`OrgId`].
///
/// # Examples
///
/// ```
/// use usage_export::domain::ids::parse_org_ids;
///
/// let ids = parse_org_ids(" org-a , org b,, org-c ").unwrap();
/// let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
/// assert_eq!(ids, vec!["org-a", "orgb", "org-c"]);
/// ```
pub fn parse_org_ids(raw: &str) -> Result<Vec<OrgId>, String> {
    raw.split(',')
        .map(|token| {
            token
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
        })
        .filter(|token| !token.is_empty())
        .map(OrgId::new)
        .collect()
}
