//! Report retrieval and materialization
//!
//! Each download URL is fetched, decompressed and renamed independently. A
//! failure on one URL is recorded and the next URL is still attempted; the
//! caller decides from [`RetrievalOutcome`] whether the run succeeded.

pub mod decompress;
pub mod naming;

pub use naming::{combined_path, plan_report_files, ReportFile};

use crate::adapters::circleci::UsageApi;
use crate::domain::{Result, UsageExportError};
use std::path::{Path, PathBuf};

/// Outcome for one download URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Report downloaded and decompressed
    Saved {
        /// Source URL
        url: String,
        /// Decompressed CSV
        path: PathBuf,
        /// Decompressed size in bytes
        bytes: u64,
    },

    /// Download or decompression failed
    Failed {
        /// Source URL
        url: String,
        /// Human-readable reason
        error: String,
    },
}

/// Outcome of retrieving every report of a job
#[derive(Debug, Clone, Default)]
pub struct RetrievalOutcome {
    /// Per-URL outcomes, in API order
    pub files: Vec<FileOutcome>,

    /// Combined CSV, when several parts were merged
    pub combined: Option<PathBuf>,

    /// Why merging failed, if it did
    pub combine_error: Option<String>,
}

impl RetrievalOutcome {
    /// Number of reports saved
    pub fn saved_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f, FileOutcome::Saved { .. }))
            .count()
    }

    /// Number of reports that failed
    pub fn failed_count(&self) -> usize {
        self.files.len() - self.saved_count()
    }

    /// True when at least one report was expected and every step succeeded
    pub fn is_complete(&self) -> bool {
        !self.files.is_empty() && self.failed_count() == 0 && self.combine_error.is_none()
    }

    /// Paths of saved reports, in API order
    pub fn saved_paths(&self) -> Vec<PathBuf> {
        self.files
            .iter()
            .filter_map(|f| match f {
                FileOutcome::Saved { path, .. } => Some(path.clone()),
                FileOutcome::Failed { .. } => None,
            })
            .collect()
    }
}

/// Downloads and decompresses report files
pub struct ReportRetriever<'a> {
    api: &'a dyn UsageApi,
    combine_parts: bool,
}

impl<'a> ReportRetriever<'a> {
    /// Create a retriever
    pub fn new(api: &'a dyn UsageApi, combine_parts: bool) -> Self {
        Self { api, combine_parts }
    }

    /// Retrieve every URL into `output_dir`
    pub async fn retrieve(
        &self,
        urls: &[String],
        output_dir: &Path,
        base_name: &str,
    ) -> RetrievalOutcome {
        let mut outcome = RetrievalOutcome::default();

        if urls.is_empty() {
            tracing::warn!("Export job completed without any download URLs");
            return outcome;
        }

        let files = plan_report_files(urls, output_dir, base_name);
        let total = files.len();

        for (index, file) in files.iter().enumerate() {
            tracing::info!(
                part = index + 1,
                total,
                url = %file.source_url,
                "Downloading usage report"
            );

            match self.materialize(file).await {
                Ok(bytes) => {
                    tracing::info!(
                        path = %file.final_path.display(),
                        bytes,
                        "Usage report saved"
                    );
                    outcome.files.push(FileOutcome::Saved {
                        url: file.source_url.clone(),
                        path: file.final_path.clone(),
                        bytes,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        url = %file.source_url,
                        error = %e,
                        "Usage report could not be retrieved, continuing with next file"
                    );
                    outcome.files.push(FileOutcome::Failed {
                        url: file.source_url.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        if total > 1 && self.combine_parts {
            self.combine(&mut outcome, output_dir, base_name).await;
        }

        outcome
    }

    async fn materialize(&self, file: &ReportFile) -> Result<u64> {
        if let Err(e) = self.api.download(&file.source_url, &file.temp_path).await {
            let _ = tokio::fs::remove_file(&file.temp_path).await;
            return Err(e);
        }

        let src = file.temp_path.clone();
        let dest = file.final_path.clone();
        let bytes = tokio::task::spawn_blocking(move || decompress::gunzip_file(&src, &dest))
            .await
            .map_err(|e| UsageExportError::Io(format!("Decompression task failed: {e}")))??;

        if let Err(e) = tokio::fs::remove_file(&file.temp_path).await {
            tracing::warn!(
                path = %file.temp_path.display(),
                error = %e,
                "Failed to remove compressed download"
            );
        }

        Ok(bytes)
    }

    async fn combine(&self, outcome: &mut RetrievalOutcome, output_dir: &Path, base_name: &str) {
        let parts = outcome.saved_paths();
        if parts.is_empty() {
            return;
        }

        let dest = combined_path(output_dir, base_name);
        let target = dest.clone();
        let result =
            tokio::task::spawn_blocking(move || decompress::combine_csv_parts(&parts, &target))
                .await
                .map_err(|e| UsageExportError::Io(format!("Combine task failed: {e}")))
                .and_then(|r| r);

        match result {
            Ok(bytes) => {
                tracing::info!(path = %dest.display(), bytes, "Combined usage report written");
                outcome.combined = Some(dest);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to write combined usage report");
                outcome.combine_error = Some(e.to_string());
            }
        }
    }
}
