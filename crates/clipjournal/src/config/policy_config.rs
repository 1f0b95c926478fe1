use crate::config::{default_ready_fallback_secs, default_stuck_timeout_secs};

use clipjournal_core::StallPolicy;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Stall detection thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Seconds to wait for a ready signal before forcing readiness.
    #[serde(default = "default_ready_fallback_secs")]
    pub ready_fallback_secs: u64,
    /// Seconds of grace before an operation counts as stuck.
    #[serde(default = "default_stuck_timeout_secs")]
    pub stuck_timeout_secs: u64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            ready_fallback_secs: default_ready_fallback_secs(),
            stuck_timeout_secs: default_stuck_timeout_secs(),
        }
    }
}

impl PolicyConfig {
    /// Policy for a device that auto-stops at `max_duration`.
    pub fn stall_policy(&self, max_duration: Duration) -> StallPolicy {
        StallPolicy {
            ready_fallback: Duration::from_secs(self.ready_fallback_secs),
            stuck_timeout: Duration::from_secs(self.stuck_timeout_secs),
            max_duration,
        }
    }
}
