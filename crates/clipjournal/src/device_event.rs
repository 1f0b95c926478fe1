use clipjournal_core::{DeviceError, OperationId, PresentationSlot, RecordedFile};

/// Callbacks from the simulated camera to the main application.
#[derive(Debug)]
pub enum DeviceEvent {
    /// A slot finished mounting the camera.
    Ready(PresentationSlot),
    /// A slot could not mount the camera.
    MountFailed {
        /// Slot that attempted the mount.
        slot: PresentationSlot,
        /// Why the mount failed.
        error: DeviceError,
    },
    /// Capture for an operation is running.
    Started(OperationId),
    /// An operation completed with a file or an error.
    Resolved {
        /// Operation the outcome belongs to.
        operation: OperationId,
        /// The finished file, or why there is none.
        outcome: Result<RecordedFile, DeviceError>,
    },
}
