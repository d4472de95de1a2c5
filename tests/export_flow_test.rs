//! End-to-end export tests against a mock CircleCI API
//!
//! Uses the real HTTP client with a recording sleeper so polling runs
//! without waiting.

use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;
use mockito::{Matcher, Server, ServerGuard};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use usage_export::adapters::circleci::CircleCiClient;
use usage_export::config::{secret_string, ApiConfig};
use usage_export::core::export::ExportCoordinator;
use usage_export::core::polling::{PollPolicy, Sleeper};
use usage_export::domain::{ApiError, ExportInput, ExportRequest, JobError, UsageExportError};

const JOBS_PATH: &str = "/organizations/org-a/usage_export_job";
const STATUS_PATH: &str = "/organizations/org-a/usage_export_job/job-1";

#[derive(Default)]
struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    fn count(&self) -> usize {
        self.sleeps.lock().unwrap().len()
    }

    fn total(&self) -> Duration {
        self.sleeps.lock().unwrap().iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn request(org_ids: &str, output_dir: &Path) -> ExportRequest {
    ExportInput {
        org_ids: Some(org_ids.to_string()),
        token: Some(secret_string("test-token".to_string())),
        start: Some("2024-01-01".to_string()),
        end: Some("2024-01-31".to_string()),
        output_dir: output_dir.to_path_buf(),
        debug: false,
    }
    .into_request()
    .unwrap()
}

fn coordinator(server: &ServerGuard, sleeper: Arc<RecordingSleeper>) -> ExportCoordinator {
    let config = ApiConfig {
        base_url: server.url(),
        timeout_seconds: 10,
    };
    let client = CircleCiClient::new(&config, secret_string("test-token".to_string())).unwrap();
    ExportCoordinator::with_components(Arc::new(client), sleeper, PollPolicy::default(), true)
}

async fn mock_job_created(server: &mut ServerGuard) -> mockito::Mock {
    server
        .mock("POST", JOBS_PATH)
        .match_header("Circle-Token", "test-token")
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"usage_export_job_id":"job-1"}"#)
        .expect(1)
        .create_async()
        .await
}

fn completed_body(urls: &[String]) -> String {
    serde_json::json!({
        "usage_export_job_id": "job-1",
        "state": "completed",
        "download_urls": urls,
    })
    .to_string()
}

#[tokio::test]
async fn test_rejected_job_creation_stops_before_polling() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", JOBS_PATH)
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"Invalid date range"}"#)
        .create_async()
        .await;
    let status = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let sleeper = Arc::new(RecordingSleeper::default());
    let err = coordinator(&server, sleeper.clone())
        .execute_export(&request("org-a", dir.path()))
        .await
        .unwrap_err();

    match err {
        UsageExportError::Api(ApiError::Message { message, raw }) => {
            assert_eq!(message, "Invalid date range");
            assert!(raw.contains("Invalid date range"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(sleeper.count(), 0);
    create.assert_async().await;
    status.assert_async().await;
}

#[tokio::test]
async fn test_single_report_is_downloaded_and_decompressed() {
    let mut server = Server::new_async().await;
    let url = format!("{}/downloads/report.csv.gz", server.url());
    let csv = "org_id,credits\norg-a,42\n";

    let create = mock_job_created(&mut server).await;
    let processing = server
        .mock("GET", STATUS_PATH)
        .match_header("Circle-Token", "test-token")
        .with_status(200)
        .with_body(r#"{"usage_export_job_id":"job-1","state":"processing"}"#)
        .expect(2)
        .create_async()
        .await;
    let completed = server
        .mock("GET", STATUS_PATH)
        .with_status(200)
        .with_body(completed_body(&[url.clone()]))
        .expect(1)
        .create_async()
        .await;
    let download = server
        .mock("GET", "/downloads/report.csv.gz")
        .match_header("Circle-Token", Matcher::Missing)
        .with_status(200)
        .with_body(gzip(csv.as_bytes()))
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let sleeper = Arc::new(RecordingSleeper::default());
    let summary = coordinator(&server, sleeper.clone())
        .execute_export(&request("org-a", dir.path()))
        .await
        .expect("export should succeed");

    assert!(summary.is_successful());
    assert_eq!(summary.poll_attempts, 3);
    assert_eq!(sleeper.count(), 2);
    assert_eq!(sleeper.total(), Duration::from_secs(60));

    let report = dir
        .path()
        .join("usage_report_2024-01-01_to_2024-01-31_org-a.csv");
    assert_eq!(std::fs::read_to_string(&report).unwrap(), csv);
    assert!(!dir.path().join("report.csv.gz").exists());
    assert!(summary.retrieval.combined.is_none());

    create.assert_async().await;
    processing.assert_async().await;
    completed.assert_async().await;
    download.assert_async().await;
}

#[tokio::test]
async fn test_job_that_never_completes_times_out() {
    let mut server = Server::new_async().await;
    let _create = mock_job_created(&mut server).await;
    let processing = server
        .mock("GET", STATUS_PATH)
        .with_status(200)
        .with_body(r#"{"usage_export_job_id":"job-1","state":"processing"}"#)
        .expect(10)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let sleeper = Arc::new(RecordingSleeper::default());
    let err = coordinator(&server, sleeper.clone())
        .execute_export(&request("org-a", dir.path()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        UsageExportError::Job(JobError::TimedOut { attempts: 10, .. })
    ));
    assert_eq!(sleeper.count(), 9);
    assert_eq!(sleeper.total(), Duration::from_secs(270));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    processing.assert_async().await;
}

#[tokio::test]
async fn test_failed_job_state_is_an_error() {
    let mut server = Server::new_async().await;
    let _create = mock_job_created(&mut server).await;
    let _status = server
        .mock("GET", STATUS_PATH)
        .with_status(200)
        .with_body(r#"{"usage_export_job_id":"job-1","state":"failed"}"#)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let sleeper = Arc::new(RecordingSleeper::default());
    let err = coordinator(&server, sleeper.clone())
        .execute_export(&request("org-a", dir.path()))
        .await
        .unwrap_err();

    match err {
        UsageExportError::Job(JobError::Failed { job_id, state }) => {
            assert_eq!(job_id, "job-1");
            assert_eq!(state, "failed");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(sleeper.count(), 0);
}

#[tokio::test]
async fn test_multiple_reports_are_saved_as_parts_and_combined() {
    let mut server = Server::new_async().await;
    let urls = vec![
        format!("{}/downloads/one.csv.gz", server.url()),
        format!("{}/downloads/two.csv.gz", server.url()),
    ];

    let create = server
        .mock("POST", "/organizations/org-a/usage_export_job")
        .match_body(Matcher::Json(serde_json::json!({
            "start": "2024-01-01T00:00:00Z",
            "end": "2024-01-31T23:59:59Z",
            "shared_org_ids": ["org-a", "org-b"]
        })))
        .with_status(201)
        .with_body(r#"{"usage_export_job_id":"job-1"}"#)
        .create_async()
        .await;
    let _status = server
        .mock("GET", STATUS_PATH)
        .with_status(200)
        .with_body(completed_body(&urls))
        .create_async()
        .await;
    let _one = server
        .mock("GET", "/downloads/one.csv.gz")
        .with_status(200)
        .with_body(gzip(b"org_id,credits\norg-a,1\n"))
        .create_async()
        .await;
    let _two = server
        .mock("GET", "/downloads/two.csv.gz")
        .with_status(200)
        .with_body(gzip(b"org_id,credits\norg-b,2\n"))
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let summary = coordinator(&server, Arc::new(RecordingSleeper::default()))
        .execute_export(&request("org-a,org-b", dir.path()))
        .await
        .expect("export should succeed");

    assert!(summary.is_successful());
    assert_eq!(summary.retrieval.saved_count(), 2);

    let base = "usage_report_2024-01-01_to_2024-01-31_org-a_org-b";
    let part1 = std::fs::read_to_string(dir.path().join(format!("{base}_part1.csv"))).unwrap();
    let part2 = std::fs::read_to_string(dir.path().join(format!("{base}_part2.csv"))).unwrap();
    assert_eq!(part1, "org_id,credits\norg-a,1\n");
    assert_eq!(part2, "org_id,credits\norg-b,2\n");

    let combined = dir.path().join(format!("{base}.csv"));
    assert_eq!(summary.retrieval.combined.as_deref(), Some(combined.as_path()));
    assert_eq!(
        std::fs::read_to_string(&combined).unwrap(),
        "org_id,credits\norg-a,1\norg-b,2\n"
    );
    create.assert_async().await;
}

#[tokio::test]
async fn test_failed_download_continues_and_marks_run_incomplete() {
    let mut server = Server::new_async().await;
    let urls = vec![
        format!("{}/downloads/missing.csv.gz", server.url()),
        format!("{}/downloads/present.csv.gz", server.url()),
    ];

    let _create = mock_job_created(&mut server).await;
    let _status = server
        .mock("GET", STATUS_PATH)
        .with_status(200)
        .with_body(completed_body(&urls))
        .create_async()
        .await;
    let _missing = server
        .mock("GET", "/downloads/missing.csv.gz")
        .with_status(404)
        .create_async()
        .await;
    let present = server
        .mock("GET", "/downloads/present.csv.gz")
        .with_status(200)
        .with_body(gzip(b"org_id,credits\norg-a,7\n"))
        .expect(1)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let summary = coordinator(&server, Arc::new(RecordingSleeper::default()))
        .execute_export(&request("org-a", dir.path()))
        .await
        .expect("per-file failures are reported in the summary");

    assert!(!summary.is_successful());
    assert_eq!(summary.retrieval.saved_count(), 1);
    assert_eq!(summary.retrieval.failed_count(), 1);
    assert!(!dir.path().join("missing.csv.gz").exists());
    assert!(dir
        .path()
        .join("usage_report_2024-01-01_to_2024-01-31_org-a_part2.csv")
        .exists());
    present.assert_async().await;
}

#[tokio::test]
async fn test_completed_job_without_urls_is_unsuccessful() {
    let mut server = Server::new_async().await;
    let _create = mock_job_created(&mut server).await;
    let _status = server
        .mock("GET", STATUS_PATH)
        .with_status(200)
        .with_body(r#"{"usage_export_job_id":"job-1","state":"completed","download_urls":[]}"#)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let summary = coordinator(&server, Arc::new(RecordingSleeper::default()))
        .execute_export(&request("org-a", dir.path()))
        .await
        .unwrap();

    assert!(summary.retrieval.files.is_empty());
    assert!(!summary.is_successful());
}
