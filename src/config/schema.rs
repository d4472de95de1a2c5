//! Configuration schema types
//!
//! Every section and field has a default, so an empty file (or no file at
//! all) yields a working configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root usage-export configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageExportConfig {
    /// CircleCI API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Job status polling settings
    #[serde(default)]
    pub polling: PollingConfig,

    /// Report output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl UsageExportConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.api.validate()?;
        self.polling.validate()?;
        self.output.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// CircleCI API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the CircleCI v2 API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl ApiConfig {
    fn validate(&self) -> Result<(), String> {
        let url = url::Url::parse(&self.base_url)
            .map_err(|e| format!("api.base_url '{}' is not a valid URL: {e}", self.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "api.base_url must use http or https, got '{}'",
                url.scheme()
            ));
        }
        if self.timeout_seconds == 0 {
            return Err("api.timeout_seconds must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Job status polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Number of status requests before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between status requests
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_seconds: default_interval_seconds(),
        }
    }
}

impl PollingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("polling.max_attempts must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output directory when `--output` is not given
    #[serde(default = "default_output_directory")]
    pub directory: String,

    /// Write a combined CSV when a job returns several files
    #[serde(default = "default_true")]
    pub combine_parts: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            combine_parts: true,
        }
    }
}

impl OutputConfig {
    fn validate(&self) -> Result<(), String> {
        if self.directory.trim().is_empty() {
            return Err("output.directory cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit console logs as JSON
    #[serde(default)]
    pub json: bool,

    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log file directory
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Log rotation (daily, hourly, never)
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid logging.level '{}'. Must be one of: {}",
                self.level,
                valid_levels.join(", ")
            ));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path is required when local_enabled = true".to_string());
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "https://circleci.com/api/v2".to_string()
}

fn default_timeout_seconds() -> u64 {
    300
}

fn default_max_attempts() -> u32 {
    10
}

fn default_interval_seconds() -> u64 {
    30
}

fn default_output_directory() -> String {
    ".".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_path() -> String {
    "./logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = UsageExportConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.base_url, "https://circleci.com/api/v2");
        assert_eq!(config.polling.max_attempts, 10);
        assert_eq!(config.polling.interval_seconds, 30);
        assert_eq!(config.output.directory, ".");
        assert!(config.output.combine_parts);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: UsageExportConfig = toml::from_str("").unwrap();
        assert_eq!(config.api.timeout_seconds, 300);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_section_fills_defaults() {
        let config: UsageExportConfig = toml::from_str("[polling]\nmax_attempts = 3\n").unwrap();
        assert_eq!(config.polling.max_attempts, 3);
        assert_eq!(config.polling.interval_seconds, 30);
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = UsageExportConfig::default();
        config.api.base_url = "not a url".to_string();
        assert!(config.validate().unwrap_err().contains("api.base_url"));

        config.api.base_url = "ftp://circleci.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = UsageExportConfig::default();
        config.polling.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_interval_allowed() {
        let mut config = UsageExportConfig::default();
        config.polling.interval_seconds = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = UsageExportConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_rotation() {
        let mut config = UsageExportConfig::default();
        config.logging.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }
}
