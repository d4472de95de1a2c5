//! # usage-export - CircleCI usage export
//!
//! usage-export asks the CircleCI usage API to build a usage report for one or
//! more organizations over a date range, waits for the job to finish and saves
//! the resulting gzip-compressed CSV reports as plain CSV files.
//!
//! ## Overview
//!
//! One run performs these steps:
//! - **Submit** a usage export job for the first organization, sharing the rest
//! - **Poll** the job status at a fixed interval with a bounded attempt count
//! - **Download** every report URL the completed job returns
//! - **Decompress** each report into a deterministically named CSV file
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (export orchestration, polling, retrieval)
//! - [`adapters`] - External integrations (CircleCI usage API)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use usage_export::config::{secret_string_opt, UsageExportConfig};
//! use usage_export::core::export::ExportCoordinator;
//! use usage_export::domain::ExportInput;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = UsageExportConfig::default();
//!
//!     let request = ExportInput {
//!         org_ids: Some("org-a,org-b".to_string()),
//!         token: secret_string_opt(std::env::var("CIRCLE_TOKEN").ok()),
//!         start: Some("2024-01-01".to_string()),
//!         end: Some("2024-01-31".to_string()),
//!         output_dir: "reports".into(),
//!         debug: false,
//!     }
//!     .into_request()?;
//!
//!     let coordinator = ExportCoordinator::new(&config, &request)?;
//!     let summary = coordinator.execute_export(&request).await?;
//!
//!     println!("Saved {} report file(s)", summary.retrieval.saved_count());
//!     Ok(())
//! }
//! ```
//!
//! ## Output files
//!
//! Reports are named after the date range and the organizations, for example
//! `usage_report_2024-01-01_to_2024-01-31_org-a_org-b.csv`. When the job
//! returns several URLs, each one is saved as `..._part<N>.csv` and the parts
//! are also concatenated into the unsuffixed file with a single header row.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
