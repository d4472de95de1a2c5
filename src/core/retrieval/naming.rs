//! Report file naming
//!
//! A single download is written to `<base>.csv`. Several downloads are
//! written to `<base>_part<N>.csv` (1-based, in API order) and, when enabled,
//! merged into `<base>.csv`. Compressed downloads are staged under the URL's
//! own file name before decompression.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Where one download URL is staged and materialized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    /// URL the report is fetched from
    pub source_url: String,

    /// Compressed download, removed after decompression
    pub temp_path: PathBuf,

    /// Decompressed CSV
    pub final_path: PathBuf,
}

/// Path of the combined report
pub fn combined_path(output_dir: &Path, base_name: &str) -> PathBuf {
    output_dir.join(format!("{base_name}.csv"))
}

/// Plans temp and final paths for each download URL
pub fn plan_report_files(urls: &[String], output_dir: &Path, base_name: &str) -> Vec<ReportFile> {
    let multi_part = urls.len() > 1;
    let mut used = HashSet::new();

    urls.iter()
        .enumerate()
        .map(|(index, url)| {
            let part = index + 1;

            let mut temp_name = url_file_name(url)
                .unwrap_or_else(|| format!("usage_report_part{part}.csv.gz"));
            if !used.insert(temp_name.clone()) {
                temp_name = format!("part{part}_{temp_name}");
                used.insert(temp_name.clone());
            }

            let final_path = if multi_part {
                output_dir.join(format!("{base_name}_part{part}.csv"))
            } else {
                combined_path(output_dir, base_name)
            };

            ReportFile {
                source_url: url.clone(),
                temp_path: output_dir.join(temp_name),
                final_path,
            }
        })
        .collect()
}

/// Last non-empty path segment of a URL, ignoring the query string
fn url_file_name(raw: &str) -> Option<String> {
    let url = url::Url::parse(raw).ok()?;
    let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}
