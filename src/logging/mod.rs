//! Logging and observability
//!
//! Structured logging with `tracing`:
//! - human-readable or JSON console output on stderr
//! - configurable log levels, `--debug` forcing `debug`
//! - optional rotating JSON log files
//!
//! # Example
//!
//! ```no_run
//! use usage_export::logging::init_logging;
//! use usage_export::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a job status poll
///
/// # Example
///
/// ```no_run
/// use usage_export::log_poll_attempt;
///
/// log_poll_attempt!(2, 10, "processing");
/// ```
#[macro_export]
macro_rules! log_poll_attempt {
    ($attempt:expr, $max_attempts:expr, $state:expr) => {
        tracing::debug!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            state = %$state,
            "Polled export job status"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use usage_export::log_error_with_context;
/// use usage_export::domain::UsageExportError;
///
/// let error = UsageExportError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
