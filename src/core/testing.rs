//! In-memory fakes shared by unit tests

use crate::adapters::circleci::{CreateJobPayload, UsageApi};
use crate::core::polling::Sleeper;
use crate::domain::ids::{JobId, OrgId};
use crate::domain::{ApiError, ExportJob, JobState, Result, UsageExportError};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Scripted status response; the last one repeats forever
#[derive(Debug, Clone)]
pub(crate) enum StatusStep {
    State(&'static str, Vec<String>),
    Message(&'static str),
    MissingState,
}

pub(crate) struct FakeApi {
    job_id: Option<&'static str>,
    create_message: Option<&'static str>,
    statuses: Mutex<VecDeque<StatusStep>>,
    downloads: HashMap<String, std::result::Result<Vec<u8>, String>>,
    pub create_calls: AtomicU32,
    pub status_calls: AtomicU32,
    pub download_calls: AtomicU32,
}

impl FakeApi {
    pub fn new(job_id: &'static str) -> Self {
        Self {
            job_id: Some(job_id),
            create_message: None,
            statuses: Mutex::new(VecDeque::new()),
            downloads: HashMap::new(),
            create_calls: AtomicU32::new(0),
            status_calls: AtomicU32::new(0),
            download_calls: AtomicU32::new(0),
        }
    }

    pub fn rejecting(message: &'static str) -> Self {
        Self {
            job_id: None,
            create_message: Some(message),
            ..Self::new("unused")
        }
    }

    pub fn with_statuses(self, steps: Vec<StatusStep>) -> Self {
        *self.statuses.lock().unwrap() = steps.into();
        self
    }

    pub fn with_download(mut self, url: &str, body: Vec<u8>) -> Self {
        self.downloads.insert(url.to_string(), Ok(body));
        self
    }

    pub fn with_failed_download(mut self, url: &str, error: &str) -> Self {
        self.downloads.insert(url.to_string(), Err(error.to_string()));
        self
    }

    fn next_status(&self) -> StatusStep {
        let mut statuses = self.statuses.lock().unwrap();
        if statuses.len() > 1 {
            statuses.pop_front().unwrap()
        } else {
            statuses
                .front()
                .cloned()
                .unwrap_or(StatusStep::MissingState)
        }
    }
}

#[async_trait]
impl UsageApi for FakeApi {
    async fn create_export_job(&self, _org: &OrgId, _payload: &CreateJobPayload) -> Result<JobId> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.create_message {
            return Err(ApiError::Message {
                message: message.to_string(),
                raw: format!(r#"{{"message":"{message}"}}"#),
            }
            .into());
        }
        Ok(JobId::new(self.job_id.unwrap_or("job")).unwrap())
    }

    async fn get_export_job(&self, _org: &OrgId, job_id: &JobId) -> Result<ExportJob> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        match self.next_status() {
            StatusStep::State(state, download_urls) => Ok(ExportJob {
                job_id: job_id.clone(),
                state: JobState::from_api(state),
                download_urls,
            }),
            StatusStep::Message(message) => Err(ApiError::Message {
                message: message.to_string(),
                raw: String::new(),
            }
            .into()),
            StatusStep::MissingState => Err(ApiError::MalformedResponse {
                status: 200,
                reason: "state is missing or null".to_string(),
                raw: "{}".to_string(),
            }
            .into()),
        }
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        match self.downloads.get(url) {
            Some(Ok(body)) => {
                std::fs::write(dest, body)?;
                Ok(body.len() as u64)
            }
            Some(Err(error)) => Err(UsageExportError::Download(error.clone())),
            None => Err(UsageExportError::Download(format!("no such url {url}"))),
        }
    }
}

#[derive(Default)]
pub(crate) struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn count(&self) -> usize {
        self.sleeps.lock().unwrap().len()
    }

    pub fn total(&self) -> Duration {
        self.sleeps.lock().unwrap().iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

pub(crate) fn gzip(data: &[u8]) -> Vec<u8> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}
