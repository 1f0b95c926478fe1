use std::fmt;

use serde::{Deserialize, Serialize};

/// UI context eligible to host the live capture device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationSlot {
    /// The primary capture screen.
    #[default]
    Main,
    /// The modal presented over other screens.
    Overlay,
}

impl fmt::Display for PresentationSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresentationSlot::Main => f.write_str("main"),
            PresentationSlot::Overlay => f.write_str("overlay"),
        }
    }
}

/// What a slot is entitled to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotRendering {
    /// The slot owns the device and renders its preview.
    LiveDevice,
    /// The slot must not mount a device instance.
    Placeholder,
}
