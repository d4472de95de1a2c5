//! Export command implementation
//!
//! Validates input, prints what is about to be submitted, runs the
//! [`ExportCoordinator`] and reports the outcome. Every failure maps to
//! exit code 1.

use super::Cli;
use crate::adapters::circleci::CreateJobPayload;
use crate::config::UsageExportConfig;
use crate::core::export::{ExportCoordinator, ExportSummary};
use crate::core::retrieval::FileOutcome;
use crate::domain::{ExportRequest, JobError, Result, UsageExportError};
use crate::log_error_with_context;
use clap::CommandFactory;

/// Exit code for a successful run
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for every failure
pub const EXIT_FAILURE: i32 = 1;

/// Execute the export
pub async fn execute(cli: &Cli, config: &UsageExportConfig) -> anyhow::Result<i32> {
    let input = cli.export_input(config);

    let missing = input.missing_fields();
    if !missing.is_empty() {
        tracing::error!(missing = ?missing, "Required arguments missing");
        eprintln!("Error: missing required arguments: {}", missing.join(", "));
        eprintln!();
        eprintln!("{}", Cli::command().render_help());
        return Ok(EXIT_FAILURE);
    }

    let request = match input.into_request() {
        Ok(request) => request,
        Err(e) => {
            log_error_with_context!(&e, "Invalid input");
            eprintln!("Error: {e}");
            return Ok(EXIT_FAILURE);
        }
    };

    print_request(&request)?;

    let coordinator = ExportCoordinator::new(config, &request)?;

    println!("🚀 Submitting usage export job...");
    match coordinator.execute_export(&request).await {
        Ok(summary) => Ok(print_summary(&summary)),
        Err(e) => {
            log_error_with_context!(&e, "Export failed");
            report_failure(&e);
            Ok(EXIT_FAILURE)
        }
    }
}

fn print_request(request: &ExportRequest) -> Result<()> {
    let org_ids: Vec<&str> = request
        .organization_ids()
        .iter()
        .map(|id| id.as_str())
        .collect();
    let payload = CreateJobPayload::from_request(request);

    println!("Organization ID(s): {}", org_ids.join(", "));
    println!("Payload: {}", serde_json::to_string(&payload)?);
    if request.debug() {
        println!("Output directory: {}", request.output_dir().display());
        println!("Request: {request:?}");
    }
    Ok(())
}

fn report_failure(error: &UsageExportError) {
    match error {
        UsageExportError::Api(api_error) => {
            eprintln!("❌ API error: {api_error}");
            if let Some(raw) = api_error.raw_response() {
                eprintln!("Full response: {raw}");
            }
        }
        UsageExportError::Job(JobError::TimedOut { job_id, attempts }) => {
            eprintln!(
                "⏱️  Export job {job_id} did not finish after {attempts} attempts. Giving up."
            );
        }
        UsageExportError::Job(JobError::Failed { job_id, state }) => {
            eprintln!("❌ Export job {job_id} finished with state: {state}");
        }
        other => eprintln!("❌ Export failed: {other}"),
    }
}

fn print_summary(summary: &ExportSummary) -> i32 {
    let retrieval = &summary.retrieval;

    println!();
    println!("📊 Export Summary:");
    println!("  Job ID: {}", summary.job_id);
    println!("  State: {}", summary.final_state);
    println!("  Poll attempts: {}", summary.poll_attempts);
    println!(
        "  Files saved: {}/{}",
        retrieval.saved_count(),
        retrieval.files.len()
    );
    for file in &retrieval.files {
        match file {
            FileOutcome::Saved { path, bytes, .. } => {
                println!("    ✔ {} ({bytes} bytes)", path.display());
            }
            FileOutcome::Failed { url, error } => {
                println!("    ✘ {url}");
                println!("      Reason: {error}");
            }
        }
    }
    if let Some(combined) = &retrieval.combined {
        println!("  Combined report: {}", combined.display());
    }
    if let Some(error) = &retrieval.combine_error {
        println!("  Combined report failed: {error}");
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if summary.is_successful() {
        println!("✅ Usage export completed successfully!");
        EXIT_SUCCESS
    } else if retrieval.files.is_empty() {
        println!("⚠️  Export job completed but returned no report files");
        EXIT_FAILURE
    } else {
        println!("⚠️  Usage export completed with failures");
        EXIT_FAILURE
    }
}
