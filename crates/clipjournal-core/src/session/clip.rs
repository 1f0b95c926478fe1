use std::{
    path::PathBuf,
    time::{Duration, SystemTime},
};

use serde::{Deserialize, Serialize};

/// File produced by the capture device when an operation completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFile {
    /// Location of the written file.
    pub uri: PathBuf,
    /// Duration reported by the device, when it knows it.
    pub duration: Option<Duration>,
}

impl RecordedFile {
    /// Creates a file handle without a device-reported duration.
    pub fn new(uri: impl Into<PathBuf>) -> Self {
        Self {
            uri: uri.into(),
            duration: None,
        }
    }
}

/// A finished recording awaiting review or hand-off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedClip {
    /// Location of the captured file on local storage.
    pub local_uri: PathBuf,
    /// Length of the recording in seconds.
    pub duration_seconds: f64,
    /// Wall-clock time the clip was finalised.
    pub created_at: SystemTime,
}

impl CapturedClip {
    /// Builds a clip from a device file, preferring the device's duration
    /// over the coordinator's own measurement.
    pub(crate) fn from_recorded(file: RecordedFile, measured: Duration) -> Self {
        let duration = file.duration.unwrap_or(measured);
        Self {
            local_uri: file.uri,
            duration_seconds: duration.as_secs_f64(),
            created_at: SystemTime::now(),
        }
    }
}
