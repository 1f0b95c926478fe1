//! Clipjournal Core Library
//!
//! Recording session coordination for a video-journaling client: one capture
//! device, two presentation slots that compete for it, and a gesture
//! classifier that turns touches into recording intents.
//!
//! # Example
//!
//! ```no_run
//! use clipjournal_core::{
//!     CaptureDevice, CoordinatorConfig, OwnerId, PresentationSlot, SessionCoordinator,
//! };
//! # use clipjournal_core::{
//! #     BackupHandle, CapturedClip, ChapterId, CoreResult, DeviceError, JobId, LocalBackup,
//! #     OperationId, RecordOptions, UploadQueue,
//! # };
//! # use std::path::Path;
//! # struct Camera;
//! # impl CaptureDevice for Camera {
//! #     fn record_start(&mut self, _: OperationId, _: &RecordOptions) -> Result<(), DeviceError> {
//! #         Ok(())
//! #     }
//! #     fn record_stop(&mut self, _: OperationId) -> Result<(), DeviceError> {
//! #         Ok(())
//! #     }
//! # }
//! # struct Backup;
//! # impl LocalBackup for Backup {
//! #     fn backup(&mut self, _: CapturedClip, _: &OwnerId) -> CoreResult<BackupHandle> {
//! #         unimplemented!()
//! #     }
//! #     fn discard(&mut self, _: &Path) -> CoreResult<()> {
//! #         Ok(())
//! #     }
//! # }
//! # struct Queue;
//! # impl UploadQueue for Queue {
//! #     fn enqueue(
//! #         &mut self,
//! #         _: &BackupHandle,
//! #         _: Option<&ChapterId>,
//! #         _: f64,
//! #     ) -> CoreResult<JobId> {
//! #         unimplemented!()
//! #     }
//! # }
//!
//! let config = CoordinatorConfig::new(OwnerId("user-1".into()));
//! let mut coordinator = SessionCoordinator::new(Camera, Backup, Queue, config);
//!
//! coordinator.on_device_ready(PresentationSlot::Main);
//! if let Err(reason) = coordinator.request_start() {
//!     println!("Cannot record yet: {}", reason);
//! }
//! ```

mod capture;
mod error;
mod gesture;
mod presentation;
mod session;

pub use {
    capture::{
        BackupHandle, CallbackDisposition, CaptureDevice, ChapterId, CoordinatorConfig,
        CoordinatorSnapshot, DEFAULT_READY_FALLBACK, DEFAULT_STABILIZATION_DELAY,
        DEFAULT_STUCK_TIMEOUT, JobId, LocalBackup, OwnerId, PolicyAction, RecordOptions,
        ReviewOutcome, STATE_CHANNEL_CAPACITY, SessionCoordinator, StallPolicy, UploadQueue,
        VideoQuality,
    },
    error::{Accepted, CoreError, DeviceError, Rejected, Result as CoreResult},
    gesture::{
        DEFAULT_CANCEL_FRACTION, DEFAULT_COMMIT_FRACTION, DEFAULT_DRAG_SLOP, DEFAULT_LONG_PRESS,
        GestureClassifier, GestureConfig, GestureEvent, Point, Zone, ZoneThresholds,
    },
    presentation::{PresentationArbiter, PresentationSlot, SlotRendering},
    session::{
        CapturedClip, InvalidTransition, OperationId, RecordOperation, RecordedFile,
        SessionEvent, SessionPhase, SessionState,
    },
};

#[cfg(test)]
mod tests;
