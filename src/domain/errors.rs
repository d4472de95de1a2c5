//! Domain error types
//!
//! This module defines the error hierarchy for usage-export.
//! Errors don't expose third-party HTTP client types.

use thiserror::Error;

/// Main usage-export error type
///
/// Every fatal path in the tool ends in one of these variants. The CLI maps
/// all of them to exit code 1.
#[derive(Debug, Error)]
pub enum UsageExportError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Missing or malformed user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Errors from the CircleCI API
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Export job did not complete
    #[error("Export job error: {0}")]
    Job(#[from] JobError),

    /// A report file could not be fetched or decompressed
    #[error("Download error: {0}")]
    Download(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// CircleCI API errors
///
/// `Message` is the vendor's own error report and is never retried.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure reaching the API
    #[error("Failed to connect to CircleCI API: {0}")]
    ConnectionFailed(String),

    /// The response carried a top-level `message` field
    #[error("{message}")]
    Message {
        /// The `message` value reported by the API
        message: String,
        /// Raw response body, shown to the operator
        raw: String,
    },

    /// The response was not JSON or lacked an expected field
    #[error("Malformed response (HTTP {status}): {reason}")]
    MalformedResponse {
        /// HTTP status code of the response
        status: u16,
        /// What was wrong with the body
        reason: String,
        /// Raw response body, shown to the operator
        raw: String,
    },
}

impl ApiError {
    /// Raw response body, if the error came from a response
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            ApiError::ConnectionFailed(_) => None,
            ApiError::Message { raw, .. } | ApiError::MalformedResponse { raw, .. } => Some(raw),
        }
    }
}

/// Export job outcome errors
#[derive(Debug, Error)]
pub enum JobError {
    /// Job reached a terminal state other than `completed`
    #[error("Export job {job_id} finished with state '{state}'")]
    Failed {
        /// Job identifier
        job_id: String,
        /// Terminal state reported by the API
        state: String,
    },

    /// Job was still processing when the attempt ceiling was hit
    #[error(
        "Timed out waiting for export job {job_id}: still processing after {attempts} attempts"
    )]
    TimedOut {
        /// Job identifier
        job_id: String,
        /// Number of status requests made
        attempts: u32,
    },
}

// Conversion from std::io::Error
impl From<std::io::Error> for UsageExportError {
    fn from(err: std::io::Error) -> Self {
        UsageExportError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for UsageExportError {
    fn from(err: serde_json::Error) -> Self {
        UsageExportError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for UsageExportError {
    fn from(err: toml::de::Error) -> Self {
        UsageExportError::Configuration(format!("TOML parse error: {err}"))
    }
}
