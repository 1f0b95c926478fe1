//! Persistent upload queue.
//!
//! Jobs are appended to a TOML file that is rewritten atomically on every
//! change. The uploader that drains it lives outside this binary.

use crate::{AppResult, persist};

use clipjournal_core::{BackupHandle, ChapterId, CoreError, CoreResult, JobId, UploadQueue};

use std::{panic::Location, path::PathBuf};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

/// Lifecycle of an upload job. The uploader advances it past `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Waiting for the uploader.
    Pending,
}

/// One queued upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadJob {
    /// Job identifier.
    pub id: String,
    /// Backup entry the job uploads.
    pub backup_id: String,
    /// Path of the backed-up file.
    pub path: PathBuf,
    /// Chapter the clip is filed under.
    #[serde(default)]
    pub chapter: Option<String>,
    /// Length of the recording in seconds.
    pub duration_seconds: f64,
    /// Current status.
    pub status: JobStatus,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct QueueFile {
    #[serde(default)]
    jobs: Vec<UploadJob>,
}

/// [`UploadQueue`] backed by a TOML file.
#[derive(Debug)]
pub struct FileUploadQueue {
    path: PathBuf,
}

impl FileUploadQueue {
    /// Creates a queue persisted at `path`. The file is created on first enqueue.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// All jobs in insertion order.
    pub fn jobs(&self) -> AppResult<Vec<UploadJob>> {
        Ok(persist::read_toml::<QueueFile>(&self.path)?.jobs)
    }

    /// Jobs still waiting for the uploader.
    pub fn pending(&self) -> AppResult<Vec<UploadJob>> {
        Ok(self
            .jobs()?
            .into_iter()
            .filter(|job| job.status == JobStatus::Pending)
            .collect())
    }
}

impl UploadQueue for FileUploadQueue {
    #[track_caller]
    #[instrument(skip(self, backup), fields(backup_id = %backup.id))]
    fn enqueue(
        &mut self,
        backup: &BackupHandle,
        chapter: Option<&ChapterId>,
        duration_seconds: f64,
    ) -> CoreResult<JobId> {
        let caller = Location::caller();
        let failed = |reason: String| CoreError::UploadFailed {
            reason,
            location: ErrorLocation::from(caller),
        };

        let mut queue: QueueFile =
            persist::read_toml(&self.path).map_err(|e| failed(e.to_string()))?;

        let id = Uuid::new_v4().to_string();
        queue.jobs.push(UploadJob {
            id: id.clone(),
            backup_id: backup.id.clone(),
            path: backup.uri.clone(),
            chapter: chapter.map(|c| c.0.clone()),
            duration_seconds,
            status: JobStatus::Pending,
        });

        persist::write_toml(&self.path, &queue).map_err(|e| failed(e.to_string()))?;

        info!(job_id = %id, queued = queue.jobs.len(), "Upload job queued");

        Ok(JobId(id))
    }
}
