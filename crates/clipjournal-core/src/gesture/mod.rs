mod classifier;
mod zone;

pub use {
    classifier::{
        DEFAULT_DRAG_SLOP, DEFAULT_LONG_PRESS, GestureClassifier, GestureConfig, GestureEvent,
        Point,
    },
    zone::{DEFAULT_CANCEL_FRACTION, DEFAULT_COMMIT_FRACTION, Zone, ZoneThresholds},
};
