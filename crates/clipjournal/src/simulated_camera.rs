//! Stand-in capture device driven by the tokio runtime.
//!
//! Behaves like a platform camera from the coordinator's point of view:
//! every call returns immediately and the outcome arrives later on the
//! device-event channel. Recordings auto-stop at their max duration.

use crate::{DeviceEvent, config::DeviceConfig};

use clipjournal_core::{
    CaptureDevice, DeviceError, OperationId, PresentationSlot, RecordOptions, RecordedFile,
};

use std::{
    panic::Location,
    path::{Path, PathBuf},
    time::Instant,
};

use error_location::ErrorLocation;
use tokio::{
    runtime::Handle,
    sync::{mpsc, oneshot},
};
use tracing::{debug, info, instrument, warn};

struct ActiveCapture {
    operation: OperationId,
    stop_tx: Option<oneshot::Sender<()>>,
    done_rx: oneshot::Receiver<()>,
}

/// [`CaptureDevice`] that writes placeholder files after configurable delays.
pub struct SimulatedCamera {
    events: mpsc::Sender<DeviceEvent>,
    capture_dir: PathBuf,
    timings: DeviceConfig,
    active: Option<ActiveCapture>,
}

impl SimulatedCamera {
    /// Creates a camera that reports on `events` and writes into `capture_dir`.
    pub fn new(
        events: mpsc::Sender<DeviceEvent>,
        capture_dir: impl Into<PathBuf>,
        timings: DeviceConfig,
    ) -> Self {
        Self {
            events,
            capture_dir: capture_dir.into(),
            timings,
            active: None,
        }
    }

    /// Mounts the camera into `slot`; the ready signal, or a mount failure
    /// when configured, follows after the mount latency.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn mount(&self, slot: PresentationSlot) -> Result<(), DeviceError> {
        let caller = Location::caller();
        let handle = runtime_handle()?;
        let events = self.events.clone();
        let latency = self.timings.mount_latency();
        let fail = self.timings.fail_mount;

        handle.spawn(async move {
            tokio::time::sleep(latency).await;

            let event = if fail {
                warn!(slot = %slot, "Simulated mount failure");
                DeviceEvent::MountFailed {
                    slot,
                    error: DeviceError::MountFailed {
                        reason: "camera permission denied".to_string(),
                        location: ErrorLocation::from(caller),
                    },
                }
            } else {
                DeviceEvent::Ready(slot)
            };

            if events.send(event).await.is_err() {
                debug!(slot = %slot, "Mount outcome dropped, receiver closed");
            }
        });

        debug!(slot = %slot, "Camera mount started");
        Ok(())
    }

    fn is_busy(&mut self) -> bool {
        self.active.as_mut().is_some_and(|active| {
            matches!(
                active.done_rx.try_recv(),
                Err(oneshot::error::TryRecvError::Empty)
            )
        })
    }
}

impl CaptureDevice for SimulatedCamera {
    #[track_caller]
    #[instrument(skip(self, options), fields(quality = %options.quality))]
    fn record_start(
        &mut self,
        operation: OperationId,
        options: &RecordOptions,
    ) -> Result<(), DeviceError> {
        if self.is_busy() {
            return Err(DeviceError::RecordingFailed {
                reason: "camera is already capturing".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let handle = runtime_handle()?;
        let (stop_tx, stop_rx) = oneshot::channel();
        let (done_tx, done_rx) = oneshot::channel();

        let capture = Capture {
            operation,
            options: *options,
            path: self.capture_dir.join(format!("capture_{}.mov", operation.get())),
            timings: self.timings.clone(),
            events: self.events.clone(),
        };

        handle.spawn(async move {
            capture.run(stop_rx).await;
            let _ = done_tx.send(());
        });

        self.active = Some(ActiveCapture {
            operation,
            stop_tx: Some(stop_tx),
            done_rx,
        });

        Ok(())
    }

    #[track_caller]
    #[instrument(skip(self))]
    fn record_stop(&mut self, operation: OperationId) -> Result<(), DeviceError> {
        let stop_tx = self
            .active
            .as_mut()
            .filter(|active| active.operation == operation)
            .and_then(|active| active.stop_tx.take());

        match stop_tx {
            Some(tx) => {
                // The capture may already have auto-stopped; its resolution is on the way.
                if tx.send(()).is_err() {
                    debug!(operation_id = %operation, "Capture already finished");
                }
                Ok(())
            }
            None => Err(DeviceError::RecordingFailed {
                reason: format!("no capture to stop for {}", operation),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

/// One capture from start acknowledgement to resolution.
struct Capture {
    operation: OperationId,
    options: RecordOptions,
    path: PathBuf,
    timings: DeviceConfig,
    events: mpsc::Sender<DeviceEvent>,
}

impl Capture {
    async fn run(self, stop_rx: oneshot::Receiver<()>) {
        tokio::time::sleep(self.timings.start_latency()).await;

        if self
            .events
            .send(DeviceEvent::Started(self.operation))
            .await
            .is_err()
        {
            return;
        }
        let started = Instant::now();

        if tokio::time::timeout(self.options.max_duration, stop_rx)
            .await
            .is_err()
        {
            info!(operation_id = %self.operation, "Max duration reached, auto-stopping");
        }
        let duration = started.elapsed();

        tokio::time::sleep(self.timings.stop_latency()).await;

        let outcome = write_placeholder(&self.path, self.operation, &self.options)
            .await
            .map(|()| RecordedFile {
                uri: self.path.clone(),
                duration: Some(duration),
            });

        if let Err(e) = &outcome {
            warn!(
                operation_id = %self.operation,
                error = %e,
                "Capture file could not be written"
            );
        }

        let resolved = DeviceEvent::Resolved {
            operation: self.operation,
            outcome,
        };
        if self.events.send(resolved).await.is_err() {
            debug!(operation_id = %self.operation, "Resolution dropped, receiver closed");
        }
    }
}

#[track_caller]
fn runtime_handle() -> Result<Handle, DeviceError> {
    Handle::try_current().map_err(|e| DeviceError::RecordingFailed {
        reason: format!("no async runtime: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })
}

async fn write_placeholder(
    path: &Path,
    operation: OperationId,
    options: &RecordOptions,
) -> Result<(), DeviceError> {
    let caller = Location::caller();
    let failed = |e: std::io::Error| DeviceError::RecordingFailed {
        reason: format!("{}: {}", path.display(), e),
        location: ErrorLocation::from(caller),
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(failed)?;
    }

    let contents = format!(
        "clipjournal simulated capture\noperation = {}\nquality = {}\nmirror = {}\n",
        operation, options.quality, options.mirror
    );
    tokio::fs::write(path, contents).await.map_err(failed)
}
