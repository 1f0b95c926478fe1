use crate::config::{default_long_press_ms, default_screen_width};

use clipjournal_core::{
    CoreResult, DEFAULT_CANCEL_FRACTION, DEFAULT_COMMIT_FRACTION, DEFAULT_DRAG_SLOP,
    GestureConfig, ZoneThresholds,
};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Gesture classifier tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureSettings {
    /// Positions left of this screen fraction cancel.
    #[serde(default = "default_cancel_fraction")]
    pub cancel_fraction: f32,
    /// Positions right of this screen fraction commit.
    #[serde(default = "default_commit_fraction")]
    pub commit_fraction: f32,
    /// Hold time for a long press, in milliseconds.
    #[serde(default = "default_long_press_ms")]
    pub long_press_ms: u64,
    /// Horizontal travel that turns a touch into a drag.
    #[serde(default = "default_drag_slop")]
    pub drag_slop: f32,
    /// Width of the touch surface in logical pixels.
    #[serde(default = "default_screen_width")]
    pub screen_width: f32,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            cancel_fraction: DEFAULT_CANCEL_FRACTION,
            commit_fraction: DEFAULT_COMMIT_FRACTION,
            long_press_ms: default_long_press_ms(),
            drag_slop: DEFAULT_DRAG_SLOP,
            screen_width: default_screen_width(),
        }
    }
}

impl GestureSettings {
    /// Builds the classifier configuration, validating the thresholds.
    #[track_caller]
    pub fn classifier_config(&self) -> CoreResult<GestureConfig> {
        Ok(GestureConfig {
            thresholds: ZoneThresholds::new(self.cancel_fraction, self.commit_fraction)?,
            long_press: Duration::from_millis(self.long_press_ms),
            drag_slop: self.drag_slop,
            screen_width: self.screen_width,
        })
    }
}

fn default_cancel_fraction() -> f32 {
    DEFAULT_CANCEL_FRACTION
}

fn default_commit_fraction() -> f32 {
    DEFAULT_COMMIT_FRACTION
}

fn default_drag_slop() -> f32 {
    DEFAULT_DRAG_SLOP
}
