//! Result type alias for usage-export

use super::errors::UsageExportError;

/// Result type alias for usage-export operations
///
/// # Examples
///
/// ```
/// use usage_export::domain::result::Result;
/// use usage_export::domain::errors::UsageExportError;
///
/// fn failing_function() -> Result<()> {
///     Err(UsageExportError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, UsageExportError>;
