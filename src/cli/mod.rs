//! CLI interface and argument parsing
//!
//! Flags fall back to environment variables (`ORG_ID`, `CIRCLE_TOKEN`,
//! `START_DATE`, `END_DATE`), then to the configuration file and defaults.
//! Required values are checked after that merge, not by clap, so that a
//! missing value produces the full usage text and exit code 1.

pub mod export;

use crate::config::{secret_string_opt, UsageExportConfig};
use crate::domain::ExportInput;
use clap::Parser;
use std::path::PathBuf;

/// Trigger a CircleCI usage export job and download its reports
#[derive(Parser, Debug)]
#[command(name = "usage-export")]
#[command(version, about, long_about = None)]
#[command(author = "Usage Export Contributors")]
pub struct Cli {
    /// Organization ID(s), comma-separated; the first one owns the job
    #[arg(long = "org_id", alias = "org-id", env = "ORG_ID", value_name = "STR")]
    pub org_id: Option<String>,

    /// CircleCI API token
    #[arg(long, env = "CIRCLE_TOKEN", hide_env_values = true, value_name = "STR")]
    pub token: Option<String>,

    /// Range start: YYYY-MM-DD or YYYY-MM-DDThh:mm:ssZ
    #[arg(long, env = "START_DATE", value_name = "STR")]
    pub start: Option<String>,

    /// Range end: YYYY-MM-DD (whole day included) or YYYY-MM-DDThh:mm:ssZ
    #[arg(long, env = "END_DATE", value_name = "STR")]
    pub end: Option<String>,

    /// Output directory [default: .]
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Show debug logs and the resolved request
    #[arg(long)]
    pub debug: bool,

    /// Path to an optional configuration file
    #[arg(short, long, env = "USAGE_EXPORT_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "USAGE_EXPORT_LOG_LEVEL")]
    pub log_level: Option<String>,
}

impl Cli {
    /// Effective log level: `--debug`, then `--log-level`, then the config file
    pub fn effective_log_level(&self, config: &UsageExportConfig) -> String {
        if self.debug {
            return "debug".to_string();
        }
        self.log_level
            .clone()
            .unwrap_or_else(|| config.logging.level.clone())
    }

    /// Merges flags with configuration defaults into unvalidated input
    pub fn export_input(&self, config: &UsageExportConfig) -> ExportInput {
        ExportInput {
            org_ids: self.org_id.clone(),
            token: secret_string_opt(self.token.clone()),
            start: self.start.clone(),
            end: self.end.clone(),
            output_dir: self
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(&config.output.directory)),
            debug: self.debug,
        }
    }
}
