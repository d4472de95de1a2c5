//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::UsageExportConfig;
use crate::domain::errors::UsageExportError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into UsageExportConfig
/// 4. Applies environment variable overrides (USAGE_EXPORT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a referenced
/// environment variable is not set, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use usage_export::config::loader::load_config;
///
/// let config = load_config("usage-export.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<UsageExportConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(UsageExportError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        UsageExportError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: UsageExportConfig = toml::from_str(&contents)?;

    finish(&mut config)?;
    Ok(config)
}

/// Loads configuration from `path` if given, otherwise starts from defaults
///
/// Environment overrides and validation apply in both cases.
pub fn load_optional_config(path: Option<&Path>) -> Result<UsageExportConfig> {
    match path {
        Some(path) => load_config(path),
        None => {
            let mut config = UsageExportConfig::default();
            finish(&mut config)?;
            Ok(config)
        }
    }
}

fn finish(config: &mut UsageExportConfig) -> Result<()> {
    apply_env_overrides(config);

    config.validate().map_err(|e| {
        UsageExportError::Configuration(format!("Configuration validation failed: {}", e))
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        // Comments are copied verbatim
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(UsageExportError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the USAGE_EXPORT_* prefix
///
/// Environment variables follow the pattern: USAGE_EXPORT_<SECTION>_<KEY>,
/// for example USAGE_EXPORT_API_BASE_URL or USAGE_EXPORT_POLLING_MAX_ATTEMPTS.
/// Unparseable numeric or boolean values are ignored.
fn apply_env_overrides(config: &mut UsageExportConfig) {
    // API overrides
    if let Ok(val) = std::env::var("USAGE_EXPORT_API_BASE_URL") {
        config.api.base_url = val;
    }
    if let Ok(val) = std::env::var("USAGE_EXPORT_API_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.api.timeout_seconds = timeout;
        }
    }

    // Polling overrides
    if let Ok(val) = std::env::var("USAGE_EXPORT_POLLING_MAX_ATTEMPTS") {
        if let Ok(attempts) = val.parse() {
            config.polling.max_attempts = attempts;
        }
    }
    if let Ok(val) = std::env::var("USAGE_EXPORT_POLLING_INTERVAL_SECONDS") {
        if let Ok(interval) = val.parse() {
            config.polling.interval_seconds = interval;
        }
    }

    // Output overrides
    if let Ok(val) = std::env::var("USAGE_EXPORT_OUTPUT_DIRECTORY") {
        config.output.directory = val;
    }
    if let Ok(val) = std::env::var("USAGE_EXPORT_OUTPUT_COMBINE_PARTS") {
        if let Ok(combine) = val.parse() {
            config.output.combine_parts = combine;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("USAGE_EXPORT_LOGGING_JSON") {
        if let Ok(json) = val.parse() {
            config.logging.json = json;
        }
    }
    if let Ok(val) = std::env::var("USAGE_EXPORT_LOGGING_LOCAL_ENABLED") {
        if let Ok(enabled) = val.parse() {
            config.logging.local_enabled = enabled;
        }
    }
    if let Ok(val) = std::env::var("USAGE_EXPORT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
