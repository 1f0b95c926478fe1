use crate::session::SessionPhase;

use error_location::ErrorLocation;
use thiserror::Error;

/// Collaborator and configuration errors with source location tracking.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The local backup writer could not persist a clip.
    #[error("Backup failed: {reason} {location}")]
    BackupFailed {
        /// Description of the backup failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A captured file could not be removed.
    #[error("Discard failed: {reason} {location}")]
    DiscardFailed {
        /// Description of the discard failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The upload queue refused a job.
    #[error("Upload enqueue failed: {reason} {location}")]
    UploadFailed {
        /// Description of the enqueue failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Gesture zone thresholds are out of range or inverted.
    #[error("Invalid zone thresholds: {reason} {location}")]
    InvalidThresholds {
        /// Why the thresholds were rejected.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Hardware or OS failure reported by the capture device.
///
/// Only ever observed through the coordinator's device callbacks, never
/// returned from an intent method.
#[derive(Error, Debug)]
pub enum DeviceError {
    /// The device could not be mounted in its presentation slot.
    #[error("Device mount failed: {reason} {location}")]
    MountFailed {
        /// Description of the mount failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The in-flight capture operation failed.
    #[error("Recording failed: {reason} {location}")]
    RecordingFailed {
        /// Description of the recording failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Marker returned when an intent passed its preconditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accepted;

/// Reason an intent was refused. Always returned synchronously to the caller.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    /// The owning slot has not signalled ready (or is still stabilizing).
    #[error("capture device is not ready")]
    DeviceNotReady,

    /// A capture operation is already in flight.
    #[error("a recording is already in progress")]
    AlreadyRecording,

    /// Stop arrived before the device acknowledged the start.
    #[error("recording has not started yet")]
    NotYetRecording,

    /// Stop was already requested for the current operation.
    #[error("recording is already stopping")]
    AlreadyStopping,

    /// Cancel was already requested for the current operation.
    #[error("recording is already cancelled")]
    AlreadyCancelled,

    /// The intent requires an active recording.
    #[error("no recording in progress")]
    NotRecording,

    /// The session is busy with a non-recording phase.
    #[error("session is {phase}, expected idle")]
    NotIdle {
        /// Phase the session was in.
        phase: SessionPhase,
    },

    /// No finished clip is awaiting review.
    #[error("no clip awaiting review")]
    NothingToReview,

    /// Acknowledgement sent while the session has not failed.
    #[error("session has not failed")]
    NotFailed,

    /// The device cannot change slots while a capture is in flight.
    #[error("capture device is busy")]
    DeviceBusy,
}

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
