//! Single-writer ownership of the capture device across presentation slots.
//!
//! Only one [`PresentationSlot`] value is ever stored, and
//! [`PresentationArbiter::transfer_to`] is its only mutator. Two live
//! platform capture sessions cannot coexist because there is nowhere to
//! record a second owner.

use crate::{Accepted, PresentationSlot, Rejected, SlotRendering};

use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

/// Mount readiness of the owning slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Readiness {
    Mounting { since: Instant },
    Ready { since: Instant },
    /// Readiness assumed by a caller-side fallback; skips stabilization.
    Forced,
    /// The owner reported a mount failure. Cleared only by a remount or transfer.
    MountFailed,
}

/// Decides which slot may mount the capture device.
#[derive(Debug)]
pub struct PresentationArbiter {
    current: PresentationSlot,
    readiness: Readiness,
    stabilization: Duration,
}

impl PresentationArbiter {
    /// Creates an arbiter with `initial` owning the device, not yet ready.
    ///
    /// `stabilization` is how long after the ready signal the device is
    /// still treated as warming up.
    pub fn new(initial: PresentationSlot, stabilization: Duration) -> Self {
        Self {
            current: initial,
            readiness: Readiness::Mounting {
                since: Instant::now(),
            },
            stabilization,
        }
    }

    /// Slot that currently owns the device.
    pub fn current_slot(&self) -> PresentationSlot {
        self.current
    }

    /// Moves device ownership to `slot`.
    ///
    /// Rejected with [`Rejected::DeviceBusy`] whenever a capture is in
    /// flight, including when `slot` already owns the device. Moving to a
    /// different slot restarts mounting, so the new owner must signal ready
    /// again before a start is accepted.
    #[instrument(skip(self))]
    pub fn transfer_to(
        &mut self,
        slot: PresentationSlot,
        capture_in_flight: bool,
    ) -> Result<Accepted, Rejected> {
        if capture_in_flight {
            warn!(from = %self.current, to = %slot, "Slot transfer refused, capture in flight");
            return Err(Rejected::DeviceBusy);
        }

        if slot == self.current {
            debug!(slot = %slot, "Slot already owns device");
            return Ok(Accepted);
        }

        let previous = self.current;
        self.current = slot;
        self.readiness = Readiness::Mounting {
            since: Instant::now(),
        };

        info!(from = %previous, to = %slot, "Capture device transferred");

        Ok(Accepted)
    }

    /// Records the one-shot ready signal from `slot`.
    ///
    /// Returns `false` when `slot` does not own the device (a late signal
    /// from the previous owner). A failed mount stays failed.
    pub fn mark_ready(&mut self, slot: PresentationSlot) -> bool {
        if slot != self.current {
            debug!(
                slot = %slot,
                owner = %self.current,
                "Ignoring ready signal from non-owning slot"
            );
            return false;
        }

        if let Readiness::Mounting { .. } = self.readiness {
            self.readiness = Readiness::Ready {
                since: Instant::now(),
            };
            info!(slot = %slot, "Capture device ready");
        }

        true
    }

    /// Treats the owning slot as ready and stabilized immediately.
    ///
    /// Ignored after a mount failure.
    pub fn force_ready(&mut self) {
        if self.readiness == Readiness::MountFailed {
            debug!(slot = %self.current, "Not forcing readiness after mount failure");
            return;
        }

        self.readiness = Readiness::Forced;
        warn!(slot = %self.current, "Capture device readiness forced");
    }

    /// Records that the owning slot failed to mount the device.
    pub fn mark_mount_failed(&mut self) {
        self.readiness = Readiness::MountFailed;
    }

    /// Whether the owning slot is stuck on a mount failure.
    pub fn is_mount_failed(&self) -> bool {
        self.readiness == Readiness::MountFailed
    }

    /// Restarts mounting on the owning slot.
    #[instrument(skip(self))]
    pub fn remount(&mut self) {
        self.readiness = Readiness::Mounting {
            since: Instant::now(),
        };
        info!(slot = %self.current, "Capture device remounting");
    }

    /// Whether the owner signalled ready and the stabilization delay passed.
    pub fn is_ready(&self) -> bool {
        match self.readiness {
            Readiness::Ready { since } => since.elapsed() >= self.stabilization,
            Readiness::Forced => true,
            Readiness::Mounting { .. } | Readiness::MountFailed => false,
        }
    }

    /// How long the owning slot has been mounting without a ready signal.
    pub fn unready_for(&self) -> Option<Duration> {
        match self.readiness {
            Readiness::Mounting { since } => Some(since.elapsed()),
            Readiness::Ready { .. } | Readiness::Forced | Readiness::MountFailed => None,
        }
    }

    /// What `slot` may render right now.
    pub fn rendering_for(&self, slot: PresentationSlot) -> SlotRendering {
        if slot == self.current {
            SlotRendering::LiveDevice
        } else {
            SlotRendering::Placeholder
        }
    }
}
