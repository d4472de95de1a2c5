//! Domain models and types for usage-export.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`OrgId`], [`JobId`])
//! - **Validated dates** ([`ExportDate`]) normalized to `YYYY-MM-DDThh:mm:ssZ`
//! - **Request and job models** ([`ExportRequest`], [`ExportJob`], [`JobState`])
//! - **Error types** ([`UsageExportError`], [`ApiError`], [`JobError`])
//! - **Result type alias** ([`Result`])
//!
//! # Example
//!
//! ```rust
//! use usage_export::config::secret_string;
//! use usage_export::domain::ExportInput;
//! use std::path::PathBuf;
//!
//! # fn example() -> usage_export::domain::Result<()> {
//! let request = ExportInput {
//!     org_ids: Some("org-a, org-b".to_string()),
//!     token: Some(secret_string("token".to_string())),
//!     start: Some("2024-1-1".to_string()),
//!     end: Some("2024-1-31".to_string()),
//!     output_dir: PathBuf::from("."),
//!     debug: false,
//! }
//! .into_request()?;
//!
//! assert_eq!(request.home_org().as_str(), "org-a");
//! # Ok(())
//! # }
//! ```

pub mod dates;
pub mod errors;
pub mod ids;
pub mod job;
pub mod request;
pub mod result;

// Re-export commonly used types for convenience
pub use dates::{DateBound, ExportDate};
pub use errors::{ApiError, JobError, UsageExportError};
pub use ids::{parse_org_ids, JobId, OrgId};
pub use job::{ExportJob, JobState};
pub use request::{ExportInput, ExportRequest};
pub use result::Result;
