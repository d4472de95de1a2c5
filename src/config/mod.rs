//! Configuration management for usage-export.
//!
//! All run-specific inputs (org ids, token, date range) come from flags or
//! environment variables. The optional TOML file only tunes how the tool
//! talks to the API and where it writes:
//!
//! ```toml
//! [api]
//! base_url = "https://circleci.com/api/v2"
//! timeout_seconds = 300
//!
//! [polling]
//! max_attempts = 10
//! interval_seconds = 30
//!
//! [output]
//! directory = "."
//! combine_parts = true
//!
//! [logging]
//! level = "info"
//! json = false
//! local_enabled = false
//! ```
//!
//! `${VAR_NAME}` placeholders are substituted from the environment, and
//! `USAGE_EXPORT_<SECTION>_<KEY>` variables override file values.

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_optional_config};
pub use schema::{ApiConfig, LoggingConfig, OutputConfig, PollingConfig, UsageExportConfig};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
