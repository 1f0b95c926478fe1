use crate::{CoreError, CoreResult};

use std::{fmt, panic::Location};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Action zone under the pointer during an active recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    /// Left margin: throw the recording away.
    Cancel,
    /// Centre: keep recording.
    Hold,
    /// Right margin: finish and keep the recording.
    Commit,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Cancel => f.write_str("cancel"),
            Zone::Hold => f.write_str("hold"),
            Zone::Commit => f.write_str("commit"),
        }
    }
}

/// Default left margin, as a fraction of screen width.
pub const DEFAULT_CANCEL_FRACTION: f32 = 0.2;
/// Default start of the right margin, as a fraction of screen width.
pub const DEFAULT_COMMIT_FRACTION: f32 = 0.8;

/// Screen-fraction boundaries between zones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneThresholds {
    cancel_fraction: f32,
    commit_fraction: f32,
}

impl Default for ZoneThresholds {
    fn default() -> Self {
        Self {
            cancel_fraction: DEFAULT_CANCEL_FRACTION,
            commit_fraction: DEFAULT_COMMIT_FRACTION,
        }
    }
}

impl ZoneThresholds {
    /// Creates thresholds; requires `0 <= cancel < commit <= 1`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidThresholds`] for out-of-range or
    /// inverted values.
    #[track_caller]
    pub fn new(cancel_fraction: f32, commit_fraction: f32) -> CoreResult<Self> {
        let in_range = |v: f32| (0.0..=1.0).contains(&v);

        if !in_range(cancel_fraction) || !in_range(commit_fraction) {
            return Err(CoreError::InvalidThresholds {
                reason: format!(
                    "fractions must lie in [0, 1], got cancel={} commit={}",
                    cancel_fraction, commit_fraction
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if cancel_fraction >= commit_fraction {
            return Err(CoreError::InvalidThresholds {
                reason: format!(
                    "cancel fraction {} must be below commit fraction {}",
                    cancel_fraction, commit_fraction
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self {
            cancel_fraction,
            commit_fraction,
        })
    }

    /// Left margin boundary.
    pub fn cancel_fraction(&self) -> f32 {
        self.cancel_fraction
    }

    /// Right margin boundary.
    pub fn commit_fraction(&self) -> f32 {
        self.commit_fraction
    }

    /// Classifies a horizontal position given as a fraction of screen width.
    ///
    /// Positions off-screen are clamped; a non-finite position is `Hold`.
    pub fn classify(&self, fraction: f32) -> Zone {
        if !fraction.is_finite() {
            return Zone::Hold;
        }

        let fraction = fraction.clamp(0.0, 1.0);

        if fraction < self.cancel_fraction {
            Zone::Cancel
        } else if fraction > self.commit_fraction {
            Zone::Commit
        } else {
            Zone::Hold
        }
    }
}
