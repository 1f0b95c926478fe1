use crate::config::{default_mount_latency_ms, default_start_latency_ms, default_stop_latency_ms};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Simulated camera timings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Delay between a slot mounting the camera and its ready signal.
    #[serde(default = "default_mount_latency_ms")]
    pub mount_latency_ms: u64,
    /// Delay between `record_start` and the start acknowledgement.
    #[serde(default = "default_start_latency_ms")]
    pub start_latency_ms: u64,
    /// Delay between `record_stop` and the finished file.
    #[serde(default = "default_stop_latency_ms")]
    pub stop_latency_ms: u64,
    /// Report a mount failure instead of a ready signal.
    #[serde(default)]
    pub fail_mount: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            mount_latency_ms: default_mount_latency_ms(),
            start_latency_ms: default_start_latency_ms(),
            stop_latency_ms: default_stop_latency_ms(),
            fail_mount: false,
        }
    }
}

impl DeviceConfig {
    /// Mount latency.
    pub fn mount_latency(&self) -> Duration {
        Duration::from_millis(self.mount_latency_ms)
    }

    /// Start latency.
    pub fn start_latency(&self) -> Duration {
        Duration::from_millis(self.start_latency_ms)
    }

    /// Stop latency.
    pub fn stop_latency(&self) -> Duration {
        Duration::from_millis(self.stop_latency_ms)
    }
}
