use crate::{DeviceError, OperationId};

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Capture resolution requested from the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VideoQuality {
    /// 640x480.
    #[serde(rename = "480p")]
    Sd480,
    /// 1280x720.
    #[default]
    #[serde(rename = "720p")]
    Hd720,
    /// 1920x1080.
    #[serde(rename = "1080p")]
    Hd1080,
}

impl fmt::Display for VideoQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoQuality::Sd480 => f.write_str("480p"),
            VideoQuality::Hd720 => f.write_str("720p"),
            VideoQuality::Hd1080 => f.write_str("1080p"),
        }
    }
}

/// Per-recording device options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordOptions {
    /// The device stops on its own after this long.
    pub max_duration: Duration,
    /// Capture resolution.
    pub quality: VideoQuality,
    /// Mirror the front camera image into the file.
    pub mirror: bool,
}

impl Default for RecordOptions {
    fn default() -> Self {
        Self {
            max_duration: Duration::from_secs(300),
            quality: VideoQuality::Hd720,
            mirror: false,
        }
    }
}

/// Platform camera and microphone.
///
/// Both calls only enqueue work and return. Outcomes come back later
/// through the coordinator's callbacks, tagged with the same
/// [`OperationId`]:
///
/// - [`SessionCoordinator::on_recording_started`](crate::SessionCoordinator::on_recording_started)
///   once capture is running;
/// - [`SessionCoordinator::on_device_resolved`](crate::SessionCoordinator::on_device_resolved)
///   exactly once with the file or the failure.
///
/// Implementations must not call back into the coordinator from inside
/// these methods.
pub trait CaptureDevice {
    /// Begins capturing for `operation`.
    ///
    /// # Errors
    ///
    /// An error means the device refused the request outright. The
    /// coordinator treats it as the operation's resolution.
    fn record_start(
        &mut self,
        operation: OperationId,
        options: &RecordOptions,
    ) -> Result<(), DeviceError>;

    /// Asks the device to finish `operation` and hand back its file.
    ///
    /// # Errors
    ///
    /// As for [`record_start`](Self::record_start).
    fn record_stop(&mut self, operation: OperationId) -> Result<(), DeviceError>;
}
