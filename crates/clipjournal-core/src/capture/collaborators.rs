use crate::{CapturedClip, CoreResult};

use std::{fmt, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};

/// Account that owns captured clips.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub String);

/// Chapter (time period) a clip is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChapterId(pub String);

/// Upload job identifier returned by the queue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ChapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Receipt for a clip persisted by [`LocalBackup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupHandle {
    /// Backup entry identifier.
    pub id: String,
    /// Where the backed-up copy lives.
    pub uri: PathBuf,
    /// Size of the copy in bytes.
    pub size_bytes: u64,
}

/// Local storage for finished clips.
pub trait LocalBackup {
    /// Persists `clip` for `owner`. Takes ownership: after this call the
    /// coordinator holds no reference to the clip.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::BackupFailed`](crate::CoreError::BackupFailed)
    /// if the clip could not be stored.
    fn backup(&mut self, clip: CapturedClip, owner: &OwnerId) -> CoreResult<BackupHandle>;

    /// Frees a captured file that will not be kept.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DiscardFailed`](crate::CoreError::DiscardFailed)
    /// if the file could not be removed.
    fn discard(&mut self, uri: &Path) -> CoreResult<()>;
}

/// Queue feeding the uploader.
pub trait UploadQueue {
    /// Schedules `backup` for upload. Fire-and-forget for the coordinator.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UploadFailed`](crate::CoreError::UploadFailed)
    /// if the job could not be recorded.
    fn enqueue(
        &mut self,
        backup: &BackupHandle,
        chapter: Option<&ChapterId>,
        duration_seconds: f64,
    ) -> CoreResult<JobId>;
}
