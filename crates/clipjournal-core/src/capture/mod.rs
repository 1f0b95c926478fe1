mod collaborators;
mod coordinator;
mod device;
mod policy;

pub use {
    collaborators::{BackupHandle, ChapterId, JobId, LocalBackup, OwnerId, UploadQueue},
    coordinator::{
        CallbackDisposition, CoordinatorConfig, CoordinatorSnapshot, DEFAULT_STABILIZATION_DELAY,
        ReviewOutcome, STATE_CHANNEL_CAPACITY, SessionCoordinator,
    },
    device::{CaptureDevice, RecordOptions, VideoQuality},
    policy::{DEFAULT_READY_FALLBACK, DEFAULT_STUCK_TIMEOUT, PolicyAction, StallPolicy},
};
