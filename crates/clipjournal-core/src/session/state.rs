//! Recording lifecycle state and its transition table.

use crate::session::CapturedClip;

use std::{fmt, time::Instant};

use serde::Serialize;
use thiserror::Error;

/// Authoritative recording lifecycle state. Exactly one value is active.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// Ready to accept a start.
    #[default]
    Idle,
    /// Start accepted, waiting for the device to acknowledge it.
    AwaitingDevice,
    /// Device is capturing.
    Recording {
        /// When the device acknowledged the start.
        since: Instant,
        /// Logical pause flag. The device keeps capturing.
        paused: bool,
    },
    /// Stop issued, waiting for the device to hand back the file.
    Stopping,
    /// A finished clip is waiting for the user's save/discard decision.
    Reviewing {
        /// The clip under review.
        clip: CapturedClip,
    },
    /// Clip is being handed to the backup collaborator.
    Saving,
    /// The operation resolved and its file was discarded.
    Cancelled,
    /// The device reported a fatal error.
    Failed {
        /// Human-readable failure description.
        reason: String,
    },
}

/// Inputs to the transition table.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A start intent passed every precondition.
    StartAccepted,
    /// Device acknowledged the start.
    DeviceStarted {
        /// When capture began.
        at: Instant,
    },
    /// Pause flag flipped.
    PauseToggled,
    /// Stop (or cancel) issued to the device.
    StopIssued,
    /// Device resolved with a file to review.
    Resolved {
        /// Clip built from the resolved file.
        clip: CapturedClip,
    },
    /// Device resolved an operation that was marked for discard.
    ResolvedDiscarded,
    /// User chose to keep the clip.
    ReviewSaved,
    /// User chose to drop the clip.
    ReviewDiscarded,
    /// Backup hand-off finished.
    SaveCompleted,
    /// Cancelled outcome observed, return to idle.
    CancelCompleted,
    /// Fatal device or persistence error.
    Fault {
        /// Failure description.
        reason: String,
    },
    /// User acknowledged a failure.
    FailureAcknowledged,
}

/// Payload-free view of [`SessionState`] for logging and rejections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// See [`SessionState::Idle`].
    Idle,
    /// See [`SessionState::AwaitingDevice`].
    AwaitingDevice,
    /// See [`SessionState::Recording`].
    Recording,
    /// See [`SessionState::Stopping`].
    Stopping,
    /// See [`SessionState::Reviewing`].
    Reviewing,
    /// See [`SessionState::Saving`].
    Saving,
    /// See [`SessionState::Cancelled`].
    Cancelled,
    /// See [`SessionState::Failed`].
    Failed,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionPhase::Idle => "idle",
            SessionPhase::AwaitingDevice => "awaiting_device",
            SessionPhase::Recording => "recording",
            SessionPhase::Stopping => "stopping",
            SessionPhase::Reviewing => "reviewing",
            SessionPhase::Saving => "saving",
            SessionPhase::Cancelled => "cancelled",
            SessionPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// An event that has no edge out of the current state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no transition from {from} on {event}")]
pub struct InvalidTransition {
    /// Phase the machine was in.
    pub from: SessionPhase,
    /// Name of the rejected event.
    pub event: &'static str,
}

impl SessionEvent {
    fn name(&self) -> &'static str {
        match self {
            SessionEvent::StartAccepted => "start_accepted",
            SessionEvent::DeviceStarted { .. } => "device_started",
            SessionEvent::PauseToggled => "pause_toggled",
            SessionEvent::StopIssued => "stop_issued",
            SessionEvent::Resolved { .. } => "resolved",
            SessionEvent::ResolvedDiscarded => "resolved_discarded",
            SessionEvent::ReviewSaved => "review_saved",
            SessionEvent::ReviewDiscarded => "review_discarded",
            SessionEvent::SaveCompleted => "save_completed",
            SessionEvent::CancelCompleted => "cancel_completed",
            SessionEvent::Fault { .. } => "fault",
            SessionEvent::FailureAcknowledged => "failure_acknowledged",
        }
    }
}

impl SessionState {
    /// Payload-free phase of this state.
    pub fn phase(&self) -> SessionPhase {
        match self {
            SessionState::Idle => SessionPhase::Idle,
            SessionState::AwaitingDevice => SessionPhase::AwaitingDevice,
            SessionState::Recording { .. } => SessionPhase::Recording,
            SessionState::Stopping => SessionPhase::Stopping,
            SessionState::Reviewing { .. } => SessionPhase::Reviewing,
            SessionState::Saving => SessionPhase::Saving,
            SessionState::Cancelled => SessionPhase::Cancelled,
            SessionState::Failed { .. } => SessionPhase::Failed,
        }
    }

    /// Whether the device is between an accepted start and its completion.
    pub fn is_capturing(&self) -> bool {
        matches!(
            self,
            SessionState::AwaitingDevice | SessionState::Recording { .. } | SessionState::Stopping
        )
    }

    /// Computes the successor state for `event`.
    ///
    /// Defined for every `(state, event)` pair: pairs without an edge yield
    /// [`InvalidTransition`] and leave the caller's state untouched.
    /// A fault while already failed keeps the first reason.
    pub fn next(&self, event: SessionEvent) -> Result<SessionState, InvalidTransition> {
        let from = self.phase();
        let name = event.name();

        let next = match (self, event) {
            (SessionState::Failed { reason }, SessionEvent::Fault { .. }) => {
                SessionState::Failed {
                    reason: reason.clone(),
                }
            }
            (_, SessionEvent::Fault { reason }) => SessionState::Failed { reason },

            (SessionState::Idle, SessionEvent::StartAccepted) => SessionState::AwaitingDevice,

            (SessionState::AwaitingDevice, SessionEvent::DeviceStarted { at }) => {
                SessionState::Recording {
                    since: at,
                    paused: false,
                }
            }

            (SessionState::Recording { since, paused }, SessionEvent::PauseToggled) => {
                SessionState::Recording {
                    since: *since,
                    paused: !paused,
                }
            }

            (SessionState::Recording { .. }, SessionEvent::StopIssued) => SessionState::Stopping,

            // The device may auto-stop at its max duration without a stop intent,
            // and may resolve before it acknowledges the start.
            (
                SessionState::AwaitingDevice
                | SessionState::Recording { .. }
                | SessionState::Stopping,
                SessionEvent::Resolved { clip },
            ) => SessionState::Reviewing { clip },

            (
                SessionState::AwaitingDevice
                | SessionState::Recording { .. }
                | SessionState::Stopping,
                SessionEvent::ResolvedDiscarded,
            ) => SessionState::Cancelled,

            (SessionState::Reviewing { .. }, SessionEvent::ReviewSaved) => SessionState::Saving,
            (SessionState::Reviewing { .. }, SessionEvent::ReviewDiscarded) => SessionState::Idle,
            (SessionState::Saving, SessionEvent::SaveCompleted) => SessionState::Idle,
            (SessionState::Cancelled, SessionEvent::CancelCompleted) => SessionState::Idle,
            (SessionState::Failed { .. }, SessionEvent::FailureAcknowledged) => SessionState::Idle,

            _ => return Err(InvalidTransition { from, event: name }),
        };

        Ok(next)
    }
}
