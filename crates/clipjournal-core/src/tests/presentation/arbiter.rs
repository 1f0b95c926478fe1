use crate::{PresentationArbiter, PresentationSlot, Rejected, SlotRendering};

use std::time::Duration;

/// WHAT: Exactly one slot renders the live device after any transfer sequence
/// WHY: Two live capture sessions crash or silently fail on real hardware
#[test]
fn given_transfer_sequence_when_checking_rendering_then_single_live_slot() {
    // Given: An arbiter owned by Main
    let mut arbiter = PresentationArbiter::new(PresentationSlot::Main, Duration::ZERO);
    let sequence = [
        PresentationSlot::Overlay,
        PresentationSlot::Overlay,
        PresentationSlot::Main,
        PresentationSlot::Overlay,
    ];

    for slot in sequence {
        // When: Transferring with no capture in flight
        let result = arbiter.transfer_to(slot, false);

        // Then: Accepted and exactly one slot is live
        assert!(result.is_ok());
        let live = [PresentationSlot::Main, PresentationSlot::Overlay]
            .into_iter()
            .filter(|s| arbiter.rendering_for(*s) == SlotRendering::LiveDevice)
            .count();
        assert_eq!(live, 1);
        assert_eq!(arbiter.current_slot(), slot);
    }
}

/// WHAT: Transfers fail while a capture is in flight, even to the owner
/// WHY: A capture in progress can never migrate slots
#[test]
fn given_capture_in_flight_when_transferring_then_device_busy() {
    // Given: An arbiter owned by Main
    let mut arbiter = PresentationArbiter::new(PresentationSlot::Main, Duration::ZERO);

    // When: Transferring anywhere while busy
    let to_overlay = arbiter.transfer_to(PresentationSlot::Overlay, true);
    let to_main = arbiter.transfer_to(PresentationSlot::Main, true);

    // Then: Both refused and ownership unchanged
    assert_eq!(to_overlay, Err(Rejected::DeviceBusy));
    assert_eq!(to_main, Err(Rejected::DeviceBusy));
    assert_eq!(arbiter.current_slot(), PresentationSlot::Main);
    assert_eq!(
        arbiter.rendering_for(PresentationSlot::Overlay),
        SlotRendering::Placeholder
    );
}

/// WHAT: A transfer resets readiness until the new owner signals
/// WHY: The new mount is a fresh device session
#[test]
fn given_ready_main_when_transferring_to_overlay_then_not_ready_until_signalled() {
    // Given: Main mounted and ready
    let mut arbiter = PresentationArbiter::new(PresentationSlot::Main, Duration::ZERO);
    assert!(arbiter.mark_ready(PresentationSlot::Main));
    assert!(arbiter.is_ready());

    // When: Moving to Overlay
    let _ = arbiter.transfer_to(PresentationSlot::Overlay, false);

    // Then: Not ready; a late signal from Main is ignored; Overlay's signal counts
    assert!(!arbiter.is_ready());
    assert!(!arbiter.mark_ready(PresentationSlot::Main));
    assert!(!arbiter.is_ready());
    assert!(arbiter.mark_ready(PresentationSlot::Overlay));
    assert!(arbiter.is_ready());
}

/// WHAT: Transferring to the current owner keeps readiness
/// WHY: Re-presenting the same screen must not force a remount
#[test]
fn given_ready_main_when_transferring_to_main_then_still_ready() {
    let mut arbiter = PresentationArbiter::new(PresentationSlot::Main, Duration::ZERO);
    arbiter.mark_ready(PresentationSlot::Main);

    let result = arbiter.transfer_to(PresentationSlot::Main, false);

    assert!(result.is_ok());
    assert!(arbiter.is_ready());
}

/// WHAT: Readiness waits for the stabilization delay
/// WHY: Starting a recording right after mount fails on some cameras
#[test]
fn given_long_stabilization_when_ready_signalled_then_not_yet_ready() {
    // Given: A one-hour stabilization delay
    let mut arbiter = PresentationArbiter::new(PresentationSlot::Main, Duration::from_secs(3600));

    // When: Main signals ready
    arbiter.mark_ready(PresentationSlot::Main);

    // Then: Still stabilizing, until readiness is forced
    assert!(!arbiter.is_ready());
    assert!(arbiter.unready_for().is_none());
    arbiter.force_ready();
    assert!(arbiter.is_ready());
}

/// WHAT: Mount time is reported only while waiting for readiness
/// WHY: Feeds the caller-side ready fallback
#[test]
fn given_mounting_slot_when_querying_unready_then_some_until_ready() {
    let mut arbiter = PresentationArbiter::new(PresentationSlot::Overlay, Duration::ZERO);
    assert!(arbiter.unready_for().is_some());

    arbiter.mark_ready(PresentationSlot::Overlay);
    assert!(arbiter.unready_for().is_none());

    arbiter.remount();
    assert!(arbiter.unready_for().is_some());
    assert!(!arbiter.is_ready());
}

/// WHAT: A failed mount is neither forced ready nor reported as mounting
/// WHY: Recovery from a mount failure is the user's decision
#[test]
fn given_mount_failed_when_forcing_or_signalling_ready_then_stays_unready() {
    // Given: Main failed to mount
    let mut arbiter = PresentationArbiter::new(PresentationSlot::Main, Duration::ZERO);
    arbiter.mark_mount_failed();

    // When: The fallback forces readiness and a late ready signal arrives
    arbiter.force_ready();
    arbiter.mark_ready(PresentationSlot::Main);

    // Then: Still failed, and nothing for a fallback timer to measure
    assert!(arbiter.is_mount_failed());
    assert!(!arbiter.is_ready());
    assert_eq!(arbiter.unready_for(), None);
}

/// WHAT: A remount or a transfer clears a mount failure
/// WHY: Both start a fresh device session that must signal ready again
#[test]
fn given_mount_failed_when_remounting_or_transferring_then_mounting_again() {
    // Given: Main failed to mount
    let mut arbiter = PresentationArbiter::new(PresentationSlot::Main, Duration::ZERO);
    arbiter.mark_mount_failed();

    // When: Remounting the same slot
    arbiter.remount();

    // Then: Mounting, and a ready signal is honoured
    assert!(!arbiter.is_mount_failed());
    assert!(arbiter.unready_for().is_some());
    assert!(arbiter.mark_ready(PresentationSlot::Main));
    assert!(arbiter.is_ready());

    // When: The overlay fails, then ownership moves back to Main
    assert!(arbiter.transfer_to(PresentationSlot::Overlay, false).is_ok());
    arbiter.mark_mount_failed();
    assert!(arbiter.transfer_to(PresentationSlot::Main, false).is_ok());

    // Then: The new owner is mounting, not failed
    assert!(!arbiter.is_mount_failed());
    assert!(arbiter.unready_for().is_some());
}
