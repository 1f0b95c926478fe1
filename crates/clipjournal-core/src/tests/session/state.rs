use crate::{CapturedClip, SessionEvent, SessionPhase, SessionState};

use std::{path::PathBuf, time::Instant, time::SystemTime};

fn clip() -> CapturedClip {
    CapturedClip {
        local_uri: PathBuf::from("/tmp/clip.mov"),
        duration_seconds: 4.0,
        created_at: SystemTime::now(),
    }
}

/// WHAT: The happy path walks Idle through Saving and back to Idle
/// WHY: Every edge of the primary lifecycle must exist in the table
#[test]
#[allow(clippy::unwrap_used)]
fn given_idle_when_driving_full_lifecycle_then_returns_to_idle() {
    // Given: A fresh state
    let state = SessionState::default();
    let at = Instant::now();

    // When: Applying the primary sequence of events
    let state = state.next(SessionEvent::StartAccepted).unwrap();
    assert_eq!(state.phase(), SessionPhase::AwaitingDevice);
    let state = state.next(SessionEvent::DeviceStarted { at }).unwrap();
    assert_eq!(
        state,
        SessionState::Recording {
            since: at,
            paused: false
        }
    );
    let state = state.next(SessionEvent::StopIssued).unwrap();
    assert_eq!(state, SessionState::Stopping);
    let state = state.next(SessionEvent::Resolved { clip: clip() }).unwrap();
    assert_eq!(state.phase(), SessionPhase::Reviewing);
    let state = state.next(SessionEvent::ReviewSaved).unwrap();
    assert_eq!(state, SessionState::Saving);
    let state = state.next(SessionEvent::SaveCompleted).unwrap();

    // Then: Back at Idle
    assert_eq!(state, SessionState::Idle);
}

/// WHAT: Pause toggles in place without leaving Recording
/// WHY: Pause is a logical flag, not a top-level state
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_when_pause_toggled_twice_then_flag_flips_and_since_kept() {
    // Given: A recording state
    let since = Instant::now();
    let state = SessionState::Recording {
        since,
        paused: false,
    };

    // When: Toggling pause twice
    let paused = state.next(SessionEvent::PauseToggled).unwrap();
    let resumed = paused.next(SessionEvent::PauseToggled).unwrap();

    // Then: Flag flips each time and the start time is preserved
    assert_eq!(
        paused,
        SessionState::Recording {
            since,
            paused: true
        }
    );
    assert_eq!(
        resumed,
        SessionState::Recording {
            since,
            paused: false
        }
    );
}

/// WHAT: Events without an edge are rejected and report the source phase
/// WHY: The transition function must be total without corrupting state
#[test]
fn given_idle_when_stop_issued_then_invalid_transition() {
    // Given: Idle
    let state = SessionState::Idle;

    // When: Applying an event that needs Recording
    let result = state.next(SessionEvent::StopIssued);

    // Then: Rejected with the originating phase and event name
    let err = result.err();
    assert!(matches!(
        err,
        Some(ref e) if e.from == SessionPhase::Idle && e.event == "stop_issued"
    ));
    assert_eq!(state, SessionState::Idle);
}

/// WHAT: A fault moves any state to Failed
/// WHY: Fatal device errors must be routable from everywhere
#[test]
#[allow(clippy::unwrap_used)]
fn given_any_state_when_fault_then_failed() {
    // Given: A representative state from each part of the lifecycle
    let states = [
        SessionState::Idle,
        SessionState::AwaitingDevice,
        SessionState::Recording {
            since: Instant::now(),
            paused: true,
        },
        SessionState::Stopping,
        SessionState::Reviewing { clip: clip() },
        SessionState::Saving,
        SessionState::Cancelled,
    ];

    for state in states {
        // When: A fault arrives
        let next = state
            .next(SessionEvent::Fault {
                reason: "lens cover closed".to_string(),
            })
            .unwrap();

        // Then: Failed with the reason
        assert_eq!(
            next,
            SessionState::Failed {
                reason: "lens cover closed".to_string()
            }
        );
    }
}

/// WHAT: A second fault keeps the first reason
/// WHY: Failures are reported once
#[test]
#[allow(clippy::unwrap_used)]
fn given_failed_when_second_fault_then_original_reason_kept() {
    // Given: A failed state
    let state = SessionState::Failed {
        reason: "first".to_string(),
    };

    // When: Another fault arrives
    let next = state
        .next(SessionEvent::Fault {
            reason: "second".to_string(),
        })
        .unwrap();

    // Then: The first reason wins
    assert_eq!(
        next,
        SessionState::Failed {
            reason: "first".to_string()
        }
    );
}

/// WHAT: Cancelled and Failed both lead back to Idle
/// WHY: Every terminal outcome resets to Idle
#[test]
#[allow(clippy::unwrap_used)]
fn given_terminal_states_when_completed_then_idle() {
    // Given/When: Completing cancel and acknowledging failure
    let from_cancel = SessionState::Cancelled
        .next(SessionEvent::CancelCompleted)
        .unwrap();
    let from_failed = SessionState::Failed {
        reason: "x".to_string(),
    }
    .next(SessionEvent::FailureAcknowledged)
    .unwrap();
    let from_review = SessionState::Reviewing { clip: clip() }
        .next(SessionEvent::ReviewDiscarded)
        .unwrap();

    // Then: All return to Idle
    assert_eq!(from_cancel, SessionState::Idle);
    assert_eq!(from_failed, SessionState::Idle);
    assert_eq!(from_review, SessionState::Idle);
}

/// WHAT: A file can be resolved straight from Recording
/// WHY: Devices auto-stop at max duration without a stop intent
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_when_resolved_without_stop_then_reviewing() {
    // Given: Recording
    let state = SessionState::Recording {
        since: Instant::now(),
        paused: false,
    };

    // When: The device resolves on its own
    let next = state.next(SessionEvent::Resolved { clip: clip() }).unwrap();

    // Then: The clip is under review
    assert!(matches!(next, SessionState::Reviewing { .. }));
}

/// WHAT: A file resolved before the start acknowledgement goes to review
/// WHY: The device does not guarantee started arrives before resolved
#[test]
#[allow(clippy::unwrap_used)]
fn given_awaiting_device_when_resolved_then_reviewing() {
    // Given: Start accepted, no acknowledgement yet
    let state = SessionState::AwaitingDevice;

    // When: The device resolves with a file
    let next = state.next(SessionEvent::Resolved { clip: clip() }).unwrap();

    // Then: The clip is under review
    assert_eq!(next.phase(), SessionPhase::Reviewing);
}

/// WHAT: Only capture phases report is_capturing
/// WHY: Callers use it to decide whether the device is busy
#[test]
fn given_states_when_checking_capturing_then_only_capture_phases_match() {
    assert!(!SessionState::Idle.is_capturing());
    assert!(SessionState::AwaitingDevice.is_capturing());
    assert!(SessionState::Stopping.is_capturing());
    assert!(!SessionState::Saving.is_capturing());
    assert!(!SessionState::Reviewing { clip: clip() }.is_capturing());
}
