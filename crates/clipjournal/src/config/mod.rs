mod capture_config;
#[allow(clippy::module_inception)]
mod config;
mod device_config;
mod gesture_config;
mod policy_config;
mod storage_config;

pub(crate) use {
    capture_config::CaptureConfig, config::Config, device_config::DeviceConfig,
    gesture_config::GestureSettings, policy_config::PolicyConfig, storage_config::StorageConfig,
};

pub(crate) const DEFAULT_MAX_DURATION_SECS: u64 = 300;
pub(crate) const DEFAULT_STABILIZATION_DELAY_MS: u64 = 500;
pub(crate) const DEFAULT_LONG_PRESS_MS: u64 = 500;
pub(crate) const DEFAULT_SCREEN_WIDTH: f32 = 390.0;
pub(crate) const DEFAULT_READY_FALLBACK_SECS: u64 = 5;
pub(crate) const DEFAULT_STUCK_TIMEOUT_SECS: u64 = 60;
pub(crate) const DEFAULT_START_LATENCY_MS: u64 = 300;
pub(crate) const DEFAULT_STOP_LATENCY_MS: u64 = 400;
pub(crate) const DEFAULT_MOUNT_LATENCY_MS: u64 = 200;

pub(crate) fn default_max_duration_secs() -> u64 {
    DEFAULT_MAX_DURATION_SECS
}

pub(crate) fn default_stabilization_delay_ms() -> u64 {
    DEFAULT_STABILIZATION_DELAY_MS
}

pub(crate) fn default_long_press_ms() -> u64 {
    DEFAULT_LONG_PRESS_MS
}

pub(crate) fn default_screen_width() -> f32 {
    DEFAULT_SCREEN_WIDTH
}

pub(crate) fn default_ready_fallback_secs() -> u64 {
    DEFAULT_READY_FALLBACK_SECS
}

pub(crate) fn default_stuck_timeout_secs() -> u64 {
    DEFAULT_STUCK_TIMEOUT_SECS
}

pub(crate) fn default_start_latency_ms() -> u64 {
    DEFAULT_START_LATENCY_MS
}

pub(crate) fn default_stop_latency_ms() -> u64 {
    DEFAULT_STOP_LATENCY_MS
}

pub(crate) fn default_mount_latency_ms() -> u64 {
    DEFAULT_MOUNT_LATENCY_MS
}
