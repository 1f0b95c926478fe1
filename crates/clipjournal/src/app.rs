use crate::{
    AppCommand, AppResult, DeviceEvent, FileBackupWriter, FileUploadQueue, SimulatedCamera,
    app_command::HELP,
};

use clipjournal_core::{
    ChapterId, GestureClassifier, GestureEvent, OperationId, Point, PolicyAction,
    PresentationSlot, Rejected, ReviewOutcome, SessionCoordinator, SessionPhase, SessionState,
    StallPolicy, Zone,
};

use std::time::{Duration, Instant};

use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::{broadcast::error::RecvError, mpsc},
};
use tracing::{debug, error, info, instrument, warn};

/// Interval driving the long-press timer and the stall policy.
const TICK_INTERVAL: Duration = Duration::from_millis(50);

pub(crate) type Coordinator =
    SessionCoordinator<SimulatedCamera, FileBackupWriter, FileUploadQueue>;

/// Recording intent requested by a finished gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GestureIntent {
    Start,
    PauseToggle,
    Cancel,
    Stop,
}

/// Intent `event` asks for while the session is in `phase`.
///
/// A long press starts from `Idle` and toggles pause while recording. A
/// release in the cancel or commit zone cancels or stops. Zone changes and
/// releases in the hold zone request nothing.
pub(crate) fn gesture_intent(event: GestureEvent, phase: SessionPhase) -> Option<GestureIntent> {
    match (event, phase) {
        (GestureEvent::LongPressComplete, SessionPhase::Idle) => Some(GestureIntent::Start),
        (GestureEvent::LongPressComplete, SessionPhase::Recording) => {
            Some(GestureIntent::PauseToggle)
        }
        (GestureEvent::Action(Zone::Cancel), _) => Some(GestureIntent::Cancel),
        (GestureEvent::Action(Zone::Commit), _) => Some(GestureIntent::Stop),
        (GestureEvent::LongPressComplete, _)
        | (GestureEvent::Action(Zone::Hold), _)
        | (GestureEvent::ZoneChanged(_), _) => None,
    }
}

/// Main application state.
///
/// Single owner of the coordinator and the gesture classifier. Every
/// input, whether a stdin line, a device callback or a timer tick, is
/// handled to completion before the next one is polled.
pub struct App {
    pub(crate) coordinator: Coordinator,
    pub(crate) classifier: GestureClassifier,
    pub(crate) policy: StallPolicy,
    pub(crate) device_rx: mpsc::Receiver<DeviceEvent>,
    pub(crate) reported_stuck: Option<OperationId>,
}

impl App {
    /// Run the main application event loop until `quit` or end of input.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Clipjournal starting");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut state_rx = self.coordinator.subscribe();
        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        self.mount(self.coordinator.current_slot());
        println!("{}", HELP);

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    match line {
                        Ok(Some(line)) if line.trim().is_empty() => {}
                        Ok(Some(line)) => match line.parse::<AppCommand>() {
                            Ok(AppCommand::Quit) => {
                                info!("Shutdown requested");
                                break;
                            }
                            Ok(cmd) => self.handle_command(cmd),
                            Err(e) => {
                                warn!(error = %e, "Ignoring input");
                                println!("? {}", e);
                            }
                        },
                        Ok(None) => {
                            info!("Input closed, shutting down");
                            break;
                        }
                        Err(e) => {
                            error!(error = ?e, "Failed to read input");
                            break;
                        }
                    }
                }

                Some(event) = self.device_rx.recv() => {
                    self.handle_device_event(event);
                }

                state = state_rx.recv() => match state {
                    Ok(state) => print_state(&state),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "State updates dropped, printing current state");
                        print_state(self.coordinator.current_state());
                    }
                    Err(RecvError::Closed) => {
                        error!("State channel closed");
                        break;
                    }
                },

                _ = ticker.tick() => {
                    self.on_tick();
                }
            }
        }

        info!("Clipjournal shut down successfully");

        Ok(())
    }

    pub(crate) fn handle_command(&mut self, cmd: AppCommand) {
        let now = Instant::now();

        match cmd {
            AppCommand::Start => report("start", self.coordinator.request_start()),
            AppCommand::Stop => report("stop", self.coordinator.request_stop()),
            AppCommand::Pause => report("pause", self.coordinator.request_pause_toggle()),
            AppCommand::Cancel => report("cancel", self.coordinator.request_cancel()),
            AppCommand::Save => self.confirm_review(true),
            AppCommand::Discard => self.confirm_review(false),
            AppCommand::Acknowledge => report("ack", self.coordinator.acknowledge_failure()),
            AppCommand::Show(slot) => self.show(slot),
            AppCommand::Remount => self.remount(),
            AppCommand::Chapter(name) => {
                info!(chapter = ?name, "Chapter selected");
                self.coordinator.set_chapter(name.map(ChapterId));
            }
            AppCommand::State => {
                print_state(self.coordinator.current_state());
                println!(
                    "slot: {} ready: {}",
                    self.coordinator.current_slot(),
                    self.coordinator.is_device_ready()
                );
            }
            AppCommand::Pending => self.print_pending(),
            AppCommand::Cleanup => match self.coordinator.backup().cleanup_missing() {
                Ok(removed) => println!("removed {} stale backup(s)", removed),
                Err(e) => error!(error = %e, "Backup cleanup failed"),
            },
            AppCommand::Uploaded(id) => match self.coordinator.backup().remove_pending(&id) {
                Ok(true) => println!("backup {} no longer pending", id),
                Ok(false) => println!("no pending backup {}", id),
                Err(e) => error!(backup_id = %id, error = %e, "Failed to update backup manifest"),
            },
            AppCommand::Width(width) => {
                info!(width, "Touch surface resized");
                self.classifier.set_screen_width(width);
            }
            AppCommand::PointerDown(x) => self.classifier.pointer_down(Point::new(x, 0.0), now),
            AppCommand::PointerMove(x) => {
                let recording = self.coordinator.current_state().phase() == SessionPhase::Recording;
                if let Some(event) = self
                    .classifier
                    .pointer_move(Point::new(x, 0.0), recording, now)
                {
                    self.handle_gesture(event);
                }
            }
            AppCommand::PointerUp => {
                if let Some(event) = self.classifier.pointer_up(now) {
                    self.handle_gesture(event);
                }
            }
            AppCommand::PointerLost => {
                if let Some(event) = self.classifier.pointer_lost() {
                    self.handle_gesture(event);
                }
            }
            AppCommand::Help => println!("{}", HELP),
            AppCommand::Quit => {}
        }
    }

    /// Issues the intent a classifier event asks for.
    #[instrument(skip(self))]
    fn handle_gesture(&mut self, event: GestureEvent) {
        if let GestureEvent::ZoneChanged(zone) = event {
            println!("zone: {}", zone);
        }

        let phase = self.coordinator.current_state().phase();
        match gesture_intent(event, phase) {
            Some(GestureIntent::Start) => report("start", self.coordinator.request_start()),
            Some(GestureIntent::PauseToggle) => {
                report("pause", self.coordinator.request_pause_toggle())
            }
            Some(GestureIntent::Cancel) => report("cancel", self.coordinator.request_cancel()),
            Some(GestureIntent::Stop) => report("stop", self.coordinator.request_stop()),
            None => debug!(phase = %phase, "Gesture requests nothing"),
        }
    }

    #[instrument(skip(self))]
    pub(crate) fn handle_device_event(&mut self, event: DeviceEvent) {
        let disposition = match event {
            DeviceEvent::Ready(slot) => self.coordinator.on_device_ready(slot),
            DeviceEvent::MountFailed { slot, error } => {
                self.coordinator.on_device_mount_failed(slot, error)
            }
            DeviceEvent::Started(operation) => self.coordinator.on_recording_started(operation),
            DeviceEvent::Resolved { operation, outcome } => {
                self.coordinator.on_device_resolved(operation, outcome)
            }
        };
        debug!(disposition = ?disposition, "Device event handled");
    }

    pub(crate) fn on_tick(&mut self) {
        if let Some(event) = self.classifier.tick(Instant::now()) {
            self.handle_gesture(event);
        }

        match self.policy.evaluate(&self.coordinator.snapshot()) {
            PolicyAction::None => {}
            PolicyAction::ForceReady => {
                warn!(
                    slot = %self.coordinator.current_slot(),
                    "No ready signal, forcing readiness"
                );
                self.coordinator.force_device_ready();
            }
            PolicyAction::Cancel => {
                warn!("Recording overran its max duration, cancelling");
                report("cancel", self.coordinator.request_cancel());
            }
            PolicyAction::ReportStuck { phase } => {
                let operation = self.coordinator.current_operation().map(|op| op.id());
                if operation.is_some() && operation != self.reported_stuck {
                    error!(phase = %phase, operation_id = ?operation, "Capture operation is stuck");
                    println!("camera is not responding ({})", phase);
                    self.reported_stuck = operation;
                }
            }
        }
    }

    fn confirm_review(&mut self, save: bool) {
        match self.coordinator.confirm_review(save) {
            Ok(ReviewOutcome::Saved { backup, job }) => {
                println!("saved {} ({} bytes)", backup.uri.display(), backup.size_bytes);
                match job {
                    Some(job) => println!("upload queued: {}", job),
                    None => println!("upload not queued; backup kept for retry"),
                }
            }
            Ok(ReviewOutcome::Discarded) => println!("clip discarded"),
            Ok(ReviewOutcome::BackupFailed) => println!("backup failed"),
            Err(rejected) => println!("save/discard rejected: {}", rejected),
        }
    }

    fn show(&mut self, slot: PresentationSlot) {
        let previous = self.coordinator.current_slot();
        match self.coordinator.transfer_to(slot) {
            Ok(_) if previous == slot => debug!(slot = %slot, "Slot already owns the camera"),
            Ok(_) => {
                info!(from = %previous, to = %slot, "Camera moved");
                self.mount(slot);
            }
            Err(rejected) => println!("show {} rejected: {}", slot, rejected),
        }
    }

    fn remount(&mut self) {
        match self.coordinator.remount_device() {
            Ok(_) => self.mount(self.coordinator.current_slot()),
            Err(rejected) => println!("remount rejected: {}", rejected),
        }
    }

    fn mount(&mut self, slot: PresentationSlot) {
        if let Err(e) = self.coordinator.device().mount(slot) {
            error!(slot = %slot, error = %e, "Camera mount failed");
            let disposition = self.coordinator.on_device_mount_failed(slot, e);
            debug!(disposition = ?disposition, "Mount failure handled");
        }
    }

    fn print_pending(&self) {
        match self.coordinator.backup().pending() {
            Ok(entries) => {
                let total: u64 = entries.iter().map(|e| e.size_bytes).sum();
                println!("{} pending backup(s), {} bytes", entries.len(), total);
                for entry in entries {
                    println!(
                        "  {} {} {:.1}s",
                        entry.id,
                        self.coordinator.backup().path_of(&entry).display(),
                        entry.duration_seconds
                    );
                }
            }
            Err(e) => error!(error = %e, "Failed to read backup manifest"),
        }

        match self.coordinator.uploads().pending() {
            Ok(jobs) => {
                println!("{} pending upload(s)", jobs.len());
                for job in jobs {
                    let chapter = job.chapter.as_deref().unwrap_or("-");
                    println!("  {} {} chapter={}", job.id, job.backup_id, chapter);
                }
            }
            Err(e) => error!(error = %e, "Failed to read upload queue"),
        }
    }
}

fn report<T>(intent: &str, result: Result<T, Rejected>) {
    if let Err(rejected) = result {
        debug!(intent, reason = %rejected, "Intent rejected");
        println!("{} rejected: {}", intent, rejected);
    }
}

fn print_state(state: &SessionState) {
    match state {
        SessionState::Recording { paused: true, .. } => println!("state: recording (paused)"),
        SessionState::Reviewing { clip } => println!(
            "state: reviewing {} ({:.1}s), save or discard",
            clip.local_uri.display(),
            clip.duration_seconds
        ),
        SessionState::Failed { reason } => println!("state: failed: {}, ack to continue", reason),
        other => println!("state: {}", other.phase()),
    }
}
