use crate::config::{default_max_duration_secs, default_stabilization_delay_ms};

use clipjournal_core::{ChapterId, OwnerId, RecordOptions, VideoQuality};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Recording configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Device auto-stops after this many seconds.
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u64,
    /// Capture resolution.
    #[serde(default)]
    pub quality: VideoQuality,
    /// Mirror the front camera image into the file.
    #[serde(default)]
    pub mirror: bool,
    /// Settle time after the ready signal, in milliseconds.
    #[serde(default = "default_stabilization_delay_ms")]
    pub stabilization_delay_ms: u64,
    /// Account recorded on every backup.
    pub owner_id: String,
    /// Chapter new uploads are filed under.
    #[serde(default)]
    pub default_chapter: Option<String>,
}

impl CaptureConfig {
    /// Options passed to every device start.
    pub fn record_options(&self) -> RecordOptions {
        RecordOptions {
            max_duration: Duration::from_secs(self.max_duration_secs),
            quality: self.quality,
            mirror: self.mirror,
        }
    }

    /// Settle time after the ready signal.
    pub fn stabilization_delay(&self) -> Duration {
        Duration::from_millis(self.stabilization_delay_ms)
    }

    /// Owner as a core identifier.
    pub fn owner(&self) -> OwnerId {
        OwnerId(self.owner_id.clone())
    }

    /// Default chapter as a core identifier.
    pub fn chapter(&self) -> Option<ChapterId> {
        self.default_chapter.clone().map(ChapterId)
    }
}
