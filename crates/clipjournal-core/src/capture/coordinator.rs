//! Recording session coordinator.
//!
//! Owns the capture device, the session state machine and the presentation
//! arbiter. UI layers only issue intents through this type; it is the sole
//! caller of [`CaptureDevice`].
//!
//! # Ordering
//!
//! Every method takes `&mut self`, so each intent and callback is one
//! check-and-set against the current state and [`RecordOperation`]. Device
//! callbacks carry the [`OperationId`] they were issued for; a mismatch means
//! the callback belongs to a superseded operation and it is dropped without
//! touching the state.

use crate::{
    Accepted, BackupHandle, CaptureDevice, CapturedClip, ChapterId, DeviceError,
    InvalidTransition, JobId, LocalBackup, OperationId, OwnerId, PresentationArbiter,
    PresentationSlot, RecordOperation, RecordOptions, RecordedFile, Rejected, SessionEvent,
    SessionPhase, SessionState, SlotRendering, UploadQueue, session::OperationIdGenerator,
};

use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument, warn};

/// Default wait after the ready signal before a start is accepted.
pub const DEFAULT_STABILIZATION_DELAY: Duration = Duration::from_millis(500);

/// Transitions buffered per subscriber before the slowest one starts lagging.
pub const STATE_CHANNEL_CAPACITY: usize = 64;

/// Coordinator settings.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Options passed to every `record_start`.
    pub record_options: RecordOptions,
    /// Settle time after the device signals ready.
    pub stabilization_delay: Duration,
    /// Slot that owns the device at startup.
    pub initial_slot: PresentationSlot,
    /// Owner recorded on every backup.
    pub owner: OwnerId,
    /// Chapter new uploads are filed under.
    pub chapter: Option<ChapterId>,
}

impl CoordinatorConfig {
    /// Default settings for `owner`.
    pub fn new(owner: OwnerId) -> Self {
        Self {
            record_options: RecordOptions::default(),
            stabilization_delay: DEFAULT_STABILIZATION_DELAY,
            initial_slot: PresentationSlot::Main,
            owner,
            chapter: None,
        }
    }
}

/// What happened to a device callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackDisposition {
    /// The callback changed coordinator state.
    Applied,
    /// The callback referred to a superseded operation or a non-owning slot.
    Stale,
    /// The callback was current but had nothing to act on.
    Ignored,
}

/// Result of a review decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// The clip was backed up. `job` is `None` if the upload queue refused it.
    Saved {
        /// Receipt from the backup writer.
        backup: BackupHandle,
        /// Upload job, when enqueueing succeeded.
        job: Option<JobId>,
    },
    /// The clip was thrown away.
    Discarded,
    /// The backup writer failed; the session is now `Failed`.
    BackupFailed,
}

/// Point-in-time timing view for caller-side policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorSnapshot {
    /// Current phase.
    pub phase: SessionPhase,
    /// Time since the session entered the current phase.
    pub phase_elapsed: Duration,
    /// Time since the active operation was accepted.
    pub operation_elapsed: Option<Duration>,
    /// Time since the device acknowledged the start.
    pub recording_elapsed: Option<Duration>,
    /// How long the owning slot has been waiting for its ready signal.
    pub unready_for: Option<Duration>,
}

/// Drives one capture at a time from intent to a reviewed clip.
pub struct SessionCoordinator<D, B, U> {
    device: D,
    backup: B,
    uploads: U,
    arbiter: PresentationArbiter,
    state: SessionState,
    phase_since: Instant,
    operation: Option<RecordOperation>,
    ids: OperationIdGenerator,
    state_tx: broadcast::Sender<SessionState>,
    config: CoordinatorConfig,
}

impl<D, B, U> SessionCoordinator<D, B, U>
where
    D: CaptureDevice,
    B: LocalBackup,
    U: UploadQueue,
{
    /// Creates an idle coordinator. The owning slot must still signal ready.
    pub fn new(device: D, backup: B, uploads: U, config: CoordinatorConfig) -> Self {
        let (state_tx, _) = broadcast::channel(STATE_CHANNEL_CAPACITY);
        let arbiter = PresentationArbiter::new(config.initial_slot, config.stabilization_delay);

        info!(
            slot = %config.initial_slot,
            owner = %config.owner,
            "SessionCoordinator initialized"
        );

        Self {
            device,
            backup,
            uploads,
            arbiter,
            state: SessionState::Idle,
            phase_since: Instant::now(),
            operation: None,
            ids: OperationIdGenerator::default(),
            state_tx,
            config,
        }
    }

    /// Current session state.
    pub fn current_state(&self) -> &SessionState {
        &self.state
    }

    /// Receiver that observes every state change, in order.
    ///
    /// Transient states such as `Saving` and `Cancelled` are delivered even
    /// though the coordinator leaves them within the same call. A receiver
    /// that falls more than [`STATE_CHANNEL_CAPACITY`] transitions behind
    /// gets `RecvError::Lagged` and resumes from the oldest retained state.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Slot that owns the device.
    pub fn current_slot(&self) -> PresentationSlot {
        self.arbiter.current_slot()
    }

    /// What `slot` may render.
    pub fn rendering_for(&self, slot: PresentationSlot) -> SlotRendering {
        self.arbiter.rendering_for(slot)
    }

    /// Whether a capture operation is in flight.
    pub fn is_operation_active(&self) -> bool {
        self.operation.as_ref().is_some_and(RecordOperation::is_active)
    }

    /// The in-flight operation, if any.
    pub fn current_operation(&self) -> Option<&RecordOperation> {
        self.operation.as_ref()
    }

    /// Whether a start would pass the readiness check.
    pub fn is_device_ready(&self) -> bool {
        self.arbiter.is_ready()
    }

    /// Time since the session entered its current phase.
    pub fn phase_elapsed(&self) -> Duration {
        self.phase_since.elapsed()
    }

    /// Time since the active operation was accepted.
    pub fn operation_elapsed(&self) -> Option<Duration> {
        self.operation.as_ref().map(RecordOperation::elapsed)
    }

    /// Time since the device acknowledged the current recording.
    pub fn recording_elapsed(&self) -> Option<Duration> {
        match self.state {
            SessionState::Recording { since, .. } => Some(since.elapsed()),
            _ => None,
        }
    }

    /// Timing view for caller-side timeout policies.
    pub fn snapshot(&self) -> CoordinatorSnapshot {
        CoordinatorSnapshot {
            phase: self.state.phase(),
            phase_elapsed: self.phase_elapsed(),
            operation_elapsed: self.operation_elapsed(),
            recording_elapsed: self.recording_elapsed(),
            unready_for: self.arbiter.unready_for(),
        }
    }

    /// Settings in use.
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Files future uploads under `chapter`.
    pub fn set_chapter(&mut self, chapter: Option<ChapterId>) {
        self.config.chapter = chapter;
    }

    /// The capture device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// The backup collaborator.
    pub fn backup(&self) -> &B {
        &self.backup
    }

    /// The upload collaborator.
    pub fn uploads(&self) -> &U {
        &self.uploads
    }

    /// Starts a new capture.
    ///
    /// Accepted only from `Idle`, with no operation in flight and the owning
    /// slot ready. Device failures after acceptance arrive through
    /// [`on_device_resolved`](Self::on_device_resolved).
    #[instrument(skip(self))]
    pub fn request_start(&mut self) -> Result<Accepted, Rejected> {
        if self.is_operation_active() {
            debug!("Start rejected, operation in flight");
            return Err(Rejected::AlreadyRecording);
        }

        match self.state.phase() {
            SessionPhase::Idle => {}
            SessionPhase::AwaitingDevice | SessionPhase::Recording | SessionPhase::Stopping => {
                return Err(Rejected::AlreadyRecording);
            }
            phase => return Err(Rejected::NotIdle { phase }),
        }

        if !self.arbiter.is_ready() {
            debug!(slot = %self.arbiter.current_slot(), "Start rejected, device not ready");
            return Err(Rejected::DeviceNotReady);
        }

        let id = self.ids.next_id();
        self.apply(SessionEvent::StartAccepted)
            .map_err(|_| Rejected::AlreadyRecording)?;
        self.operation = Some(RecordOperation::new(id));

        info!(
            operation_id = %id,
            quality = %self.config.record_options.quality,
            "Recording start requested"
        );

        if let Err(e) = self.device.record_start(id, &self.config.record_options) {
            error!(operation_id = %id, error = ?e, "Device refused record_start");
            let _ = self.on_device_resolved(id, Err(e));
        }

        Ok(Accepted)
    }

    /// Finishes the current capture and keeps its file for review.
    #[instrument(skip(self))]
    pub fn request_stop(&mut self) -> Result<Accepted, Rejected> {
        match self.state.phase() {
            SessionPhase::Recording => {}
            SessionPhase::Stopping => return Err(Rejected::AlreadyStopping),
            SessionPhase::AwaitingDevice => return Err(Rejected::NotYetRecording),
            _ => return Err(Rejected::NotRecording),
        }

        let id = self.latch_stop()?;
        self.issue_stop(id);

        Ok(Accepted)
    }

    /// Flips the logical pause flag. The device keeps capturing.
    #[instrument(skip(self))]
    pub fn request_pause_toggle(&mut self) -> Result<Accepted, Rejected> {
        match self.state.phase() {
            SessionPhase::Recording => {}
            SessionPhase::AwaitingDevice => return Err(Rejected::NotYetRecording),
            _ => return Err(Rejected::NotRecording),
        }

        self.apply(SessionEvent::PauseToggled)
            .map_err(|_| Rejected::NotRecording)?;

        if let SessionState::Recording { paused, .. } = self.state {
            info!(paused, "Recording pause toggled");
        }

        Ok(Accepted)
    }

    /// Throws the current capture away once the device hands it back.
    ///
    /// From `Recording` this also issues the device stop. From `Stopping`
    /// only the discard flag is set; the device was already told to stop.
    #[instrument(skip(self))]
    pub fn request_cancel(&mut self) -> Result<Accepted, Rejected> {
        match self.state.phase() {
            SessionPhase::Recording => {
                let op = self.operation.as_mut().ok_or(Rejected::NotRecording)?;
                op.mark_discard();
                let id = self.latch_stop()?;
                info!(operation_id = %id, "Recording cancel requested");
                self.issue_stop(id);
                Ok(Accepted)
            }
            SessionPhase::Stopping => {
                let op = self.operation.as_mut().ok_or(Rejected::NotRecording)?;
                if !op.mark_discard() {
                    return Err(Rejected::AlreadyCancelled);
                }
                info!(operation_id = %op.id(), "Stopping recording marked for discard");
                Ok(Accepted)
            }
            SessionPhase::AwaitingDevice => Err(Rejected::NotYetRecording),
            _ => Err(Rejected::NotRecording),
        }
    }

    /// Resolves the clip under review: back it up and queue it, or drop it.
    #[instrument(skip(self))]
    pub fn confirm_review(&mut self, save: bool) -> Result<ReviewOutcome, Rejected> {
        if self.state.phase() != SessionPhase::Reviewing {
            return Err(Rejected::NothingToReview);
        }

        let event = if save {
            SessionEvent::ReviewSaved
        } else {
            SessionEvent::ReviewDiscarded
        };

        let clip = match self.apply(event) {
            Ok(SessionState::Reviewing { clip }) => clip,
            _ => return Err(Rejected::NothingToReview),
        };

        if save {
            Ok(self.hand_off(clip))
        } else {
            self.dispose(&clip.local_uri);
            info!("Clip discarded after review");
            Ok(ReviewOutcome::Discarded)
        }
    }

    /// Returns a failed session to `Idle`. Retry is a fresh start.
    #[instrument(skip(self))]
    pub fn acknowledge_failure(&mut self) -> Result<Accepted, Rejected> {
        self.apply(SessionEvent::FailureAcknowledged)
            .map_err(|_| Rejected::NotFailed)?;
        info!("Failure acknowledged");
        Ok(Accepted)
    }

    /// Moves device ownership to `slot`. Refused while a capture is in flight.
    pub fn transfer_to(&mut self, slot: PresentationSlot) -> Result<Accepted, Rejected> {
        let busy = self.is_operation_active();
        self.arbiter.transfer_to(slot, busy)
    }

    /// Restarts mounting on the owning slot, clearing an earlier mount failure.
    ///
    /// The caller remounts the device afterwards; the slot must signal ready
    /// again before a start is accepted.
    #[instrument(skip(self))]
    pub fn remount_device(&mut self) -> Result<Accepted, Rejected> {
        if self.is_operation_active() {
            warn!("Remount refused, capture in flight");
            return Err(Rejected::DeviceBusy);
        }

        self.arbiter.remount();
        Ok(Accepted)
    }

    /// Whether the owning slot reported a mount failure and has not remounted.
    pub fn is_mount_failed(&self) -> bool {
        self.arbiter.is_mount_failed()
    }

    /// One-shot ready signal from the slot that mounted the device.
    ///
    /// A ready signal after a mount failure is ignored; only a transfer or
    /// [`remount_device`](Self::remount_device) clears the failure.
    #[instrument(skip(self))]
    pub fn on_device_ready(&mut self, slot: PresentationSlot) -> CallbackDisposition {
        if self.arbiter.is_mount_failed() && slot == self.arbiter.current_slot() {
            debug!(slot = %slot, "Ready signal after mount failure ignored");
            return CallbackDisposition::Ignored;
        }

        if self.arbiter.mark_ready(slot) {
            CallbackDisposition::Applied
        } else {
            CallbackDisposition::Stale
        }
    }

    /// Applies a caller-side readiness fallback to the owning slot.
    ///
    /// Has no effect after a mount failure.
    pub fn force_device_ready(&mut self) {
        self.arbiter.force_ready();
    }

    /// Mount failure reported by `slot`. Reported once; never retried here.
    #[instrument(skip(self, error))]
    pub fn on_device_mount_failed(
        &mut self,
        slot: PresentationSlot,
        error: DeviceError,
    ) -> CallbackDisposition {
        if slot != self.arbiter.current_slot() {
            debug!(slot = %slot, error = %error, "Mount failure from non-owning slot ignored");
            return CallbackDisposition::Stale;
        }

        self.arbiter.mark_mount_failed();

        if self.state.phase() == SessionPhase::Failed {
            debug!(error = %error, "Mount failure while already failed");
            return CallbackDisposition::Ignored;
        }

        error!(slot = %slot, error = %error, "Capture device mount failed");
        self.fault(error.to_string());
        CallbackDisposition::Applied
    }

    /// Device acknowledgement that capture for `operation` is running.
    #[instrument(skip(self))]
    pub fn on_recording_started(&mut self, operation: OperationId) -> CallbackDisposition {
        if self.current_op_matching(operation).is_none() {
            return CallbackDisposition::Stale;
        }

        let at = Instant::now();

        match self.apply(SessionEvent::DeviceStarted { at }) {
            Ok(_) => {
                if let Some(op) = self.operation.as_mut() {
                    op.mark_recording(at);
                }
                info!(operation_id = %operation, "Recording started");
                CallbackDisposition::Applied
            }
            Err(e) => {
                debug!(operation_id = %operation, error = %e, "Start acknowledgement ignored");
                CallbackDisposition::Ignored
            }
        }
    }

    /// The single completion callback for `operation`.
    ///
    /// Accepted in every state. A callback for anything other than the
    /// in-flight operation is dropped. Otherwise the operation ends here and
    /// this is the only place its file is kept or freed.
    #[instrument(skip(self, outcome))]
    pub fn on_device_resolved(
        &mut self,
        operation: OperationId,
        outcome: Result<RecordedFile, DeviceError>,
    ) -> CallbackDisposition {
        if self.current_op_matching(operation).is_none() {
            if let Ok(file) = &outcome {
                debug!(uri = ?file.uri, "Stale resolution ignored");
            }
            return CallbackDisposition::Stale;
        }

        let Some(op) = self.operation.take().map(RecordOperation::finish) else {
            return CallbackDisposition::Stale;
        };

        let measured = op.recorded_for();

        match (outcome, op.marked_for_discard()) {
            (Ok(file), true) => {
                self.dispose(&file.uri);
                self.finish_cancelled(operation);
            }
            (Err(e), true) => {
                warn!(
                    operation_id = %operation,
                    error = %e,
                    "Cancelled operation resolved with error"
                );
                self.finish_cancelled(operation);
            }
            (Ok(file), false) => {
                let uri = file.uri.clone();
                let clip = CapturedClip::from_recorded(file, measured);
                let duration_seconds = clip.duration_seconds;

                match self.apply(SessionEvent::Resolved { clip }) {
                    Ok(_) => {
                        info!(
                            operation_id = %operation,
                            uri = ?uri,
                            duration_seconds,
                            "Recording ready for review"
                        );
                    }
                    Err(e) => {
                        warn!(
                            operation_id = %operation,
                            error = %e,
                            "Resolved file has no reviewer, discarding"
                        );
                        self.dispose(&uri);
                        self.fault(format!("recording resolved outside capture ({})", e.from));
                    }
                }
            }
            (Err(e), false) => {
                error!(operation_id = %operation, error = %e, "Recording failed");
                self.fault(e.to_string());
            }
        }

        CallbackDisposition::Applied
    }

    /// Applies `event`, publishes the new state and returns the old one.
    fn apply(&mut self, event: SessionEvent) -> Result<SessionState, InvalidTransition> {
        let next = self.state.next(event)?;
        debug!(from = %self.state.phase(), to = %next.phase(), "Session transition");

        if next.phase() != self.state.phase() {
            self.phase_since = Instant::now();
        }

        let previous = std::mem::replace(&mut self.state, next);

        // No subscribers is not an error.
        let _ = self.state_tx.send(self.state.clone());

        Ok(previous)
    }

    fn fault(&mut self, reason: String) {
        if let Err(e) = self.apply(SessionEvent::Fault { reason }) {
            error!(error = %e, "Fault transition rejected");
        }
    }

    fn current_op_matching(&mut self, operation: OperationId) -> Option<&mut RecordOperation> {
        match self.operation.as_mut() {
            Some(op) if op.id() == operation && op.is_active() => Some(op),
            Some(op) => {
                warn!(
                    operation_id = %operation,
                    current = %op.id(),
                    "Stale operation callback discarded"
                );
                None
            }
            None => {
                warn!(operation_id = %operation, "Callback with no operation in flight discarded");
                None
            }
        }
    }

    /// Sets the stop latch and moves to `Stopping`.
    fn latch_stop(&mut self) -> Result<OperationId, Rejected> {
        let op = self.operation.as_mut().ok_or(Rejected::NotRecording)?;
        if !op.latch_stop() {
            return Err(Rejected::AlreadyStopping);
        }
        let id = op.id();

        self.apply(SessionEvent::StopIssued)
            .map_err(|_| Rejected::NotRecording)?;

        Ok(id)
    }

    fn issue_stop(&mut self, id: OperationId) {
        info!(operation_id = %id, "Recording stop requested");
        if let Err(e) = self.device.record_stop(id) {
            error!(operation_id = %id, error = ?e, "Device refused record_stop");
            let _ = self.on_device_resolved(id, Err(e));
        }
    }

    fn finish_cancelled(&mut self, operation: OperationId) {
        match self.apply(SessionEvent::ResolvedDiscarded) {
            Ok(_) => {
                if let Err(e) = self.apply(SessionEvent::CancelCompleted) {
                    error!(error = %e, "Cancelled session could not return to idle");
                }
                info!(operation_id = %operation, "Recording cancelled");
            }
            Err(e) => {
                debug!(
                    operation_id = %operation,
                    error = %e,
                    "Cancelled operation resolved outside capture"
                );
            }
        }
    }

    fn hand_off(&mut self, clip: CapturedClip) -> ReviewOutcome {
        let duration_seconds = clip.duration_seconds;

        let backup = match self.backup.backup(clip, &self.config.owner) {
            Ok(handle) => handle,
            Err(e) => {
                error!(error = %e, "Backup failed");
                self.fault(e.to_string());
                return ReviewOutcome::BackupFailed;
            }
        };

        info!(backup_id = %backup.id, uri = ?backup.uri, "Clip backed up");

        let job = match self
            .uploads
            .enqueue(&backup, self.config.chapter.as_ref(), duration_seconds)
        {
            Ok(job) => {
                info!(job_id = %job, "Upload queued");
                Some(job)
            }
            Err(e) => {
                warn!(backup_id = %backup.id, error = %e, "Upload enqueue failed, backup kept");
                None
            }
        };

        if let Err(e) = self.apply(SessionEvent::SaveCompleted) {
            error!(error = %e, "Saved session could not return to idle");
        }

        ReviewOutcome::Saved { backup, job }
    }

    fn dispose(&mut self, uri: &std::path::Path) {
        if let Err(e) = self.backup.discard(uri) {
            warn!(uri = ?uri, error = %e, "Failed to discard captured file");
        }
    }
}
