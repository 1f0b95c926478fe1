//! Caller-side timeout policy.
//!
//! The coordinator never times anything out on its own. A host evaluates
//! this policy against [`CoordinatorSnapshot`]s on a periodic tick and
//! decides what to do with the recommendation.

use crate::{CoordinatorSnapshot, SessionPhase};

use std::time::Duration;

/// Default wait for a ready signal before forcing readiness.
pub const DEFAULT_READY_FALLBACK: Duration = Duration::from_secs(5);
/// Default grace period before an operation counts as stuck.
pub const DEFAULT_STUCK_TIMEOUT: Duration = Duration::from_secs(60);

/// Recommendation from [`StallPolicy::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyAction {
    /// Nothing to do.
    None,
    /// The owning slot never signalled ready; treat it as ready.
    ForceReady,
    /// The device overran its max duration without resolving; cancel.
    Cancel,
    /// The operation is stuck in a phase with no useful intent; tell the user.
    ReportStuck {
        /// Phase the operation is stuck in.
        phase: SessionPhase,
    },
}

/// Thresholds for readiness fallback and stuck-operation detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StallPolicy {
    /// How long a slot may mount without signalling ready.
    pub ready_fallback: Duration,
    /// Grace period on top of the expected duration of a phase.
    pub stuck_timeout: Duration,
    /// The device's configured max recording duration.
    pub max_duration: Duration,
}

impl StallPolicy {
    /// Default thresholds for a device that auto-stops at `max_duration`.
    pub fn new(max_duration: Duration) -> Self {
        Self {
            ready_fallback: DEFAULT_READY_FALLBACK,
            stuck_timeout: DEFAULT_STUCK_TIMEOUT,
            max_duration,
        }
    }

    /// Recommends at most one action for `snapshot`.
    pub fn evaluate(&self, snapshot: &CoordinatorSnapshot) -> PolicyAction {
        match snapshot.phase {
            SessionPhase::Recording => {
                let limit = self.max_duration.saturating_add(self.stuck_timeout);
                if snapshot.recording_elapsed.is_some_and(|e| e > limit) {
                    return PolicyAction::Cancel;
                }
            }
            // Measured from phase entry; the recording time before a stop
            // does not count against the device.
            SessionPhase::AwaitingDevice | SessionPhase::Stopping => {
                if snapshot.operation_elapsed.is_some()
                    && snapshot.phase_elapsed > self.stuck_timeout
                {
                    return PolicyAction::ReportStuck {
                        phase: snapshot.phase,
                    };
                }
            }
            _ => {}
        }

        if snapshot.operation_elapsed.is_none()
            && snapshot.unready_for.is_some_and(|w| w > self.ready_fallback)
        {
            return PolicyAction::ForceReady;
        }

        PolicyAction::None
    }
}
