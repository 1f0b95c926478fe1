use crate::{CoordinatorSnapshot, PolicyAction, SessionPhase, StallPolicy};

use std::time::Duration;

fn policy() -> StallPolicy {
    StallPolicy::new(Duration::from_secs(300))
}

fn snapshot(phase: SessionPhase) -> CoordinatorSnapshot {
    CoordinatorSnapshot {
        phase,
        phase_elapsed: Duration::ZERO,
        operation_elapsed: None,
        recording_elapsed: None,
        unready_for: None,
    }
}

/// WHAT: A slot that never signals ready is forced after the fallback
/// WHY: Some cameras never fire their ready callback
#[test]
fn given_idle_unready_past_fallback_when_evaluating_then_force_ready() {
    // Given: Idle, mounting for six seconds
    let snap = CoordinatorSnapshot {
        unready_for: Some(Duration::from_secs(6)),
        ..snapshot(SessionPhase::Idle)
    };

    // When/Then: Readiness is forced
    assert_eq!(policy().evaluate(&snap), PolicyAction::ForceReady);
}

/// WHAT: Mounting within the fallback window is left alone
/// WHY: Normal mounts take a second or two
#[test]
fn given_idle_unready_within_fallback_when_evaluating_then_none() {
    let snap = CoordinatorSnapshot {
        unready_for: Some(Duration::from_secs(2)),
        ..snapshot(SessionPhase::Idle)
    };

    assert_eq!(policy().evaluate(&snap), PolicyAction::None);
}

/// WHAT: A recording that overran max duration plus grace is cancelled
/// WHY: The device should have auto-stopped and resolved by then
#[test]
fn given_recording_past_max_duration_and_grace_when_evaluating_then_cancel() {
    // Given: Recording for 361s against a 300s max and 60s grace
    let snap = CoordinatorSnapshot {
        operation_elapsed: Some(Duration::from_secs(362)),
        recording_elapsed: Some(Duration::from_secs(361)),
        ..snapshot(SessionPhase::Recording)
    };

    // When/Then: Cancel recommended
    assert_eq!(policy().evaluate(&snap), PolicyAction::Cancel);
}

/// WHAT: A long but legitimate recording is not cancelled
/// WHY: Users may record right up to the max duration
#[test]
fn given_recording_within_limit_when_evaluating_then_none() {
    let snap = CoordinatorSnapshot {
        operation_elapsed: Some(Duration::from_secs(299)),
        recording_elapsed: Some(Duration::from_secs(298)),
        ..snapshot(SessionPhase::Recording)
    };

    assert_eq!(policy().evaluate(&snap), PolicyAction::None);
}

/// WHAT: An operation stuck awaiting the device is reported
/// WHY: No intent is legal there, so the user must be told
#[test]
fn given_awaiting_device_past_stuck_timeout_when_evaluating_then_report_stuck() {
    let snap = CoordinatorSnapshot {
        phase_elapsed: Duration::from_secs(61),
        operation_elapsed: Some(Duration::from_secs(61)),
        ..snapshot(SessionPhase::AwaitingDevice)
    };

    assert_eq!(
        policy().evaluate(&snap),
        PolicyAction::ReportStuck {
            phase: SessionPhase::AwaitingDevice
        }
    );
}

/// WHAT: Readiness is never forced while an operation is in flight
/// WHY: Forcing readiness mid-capture would mask a real device problem
#[test]
fn given_operation_in_flight_when_unready_then_no_force_ready() {
    let snap = CoordinatorSnapshot {
        operation_elapsed: Some(Duration::from_secs(10)),
        unready_for: Some(Duration::from_secs(30)),
        ..snapshot(SessionPhase::Stopping)
    };

    assert_eq!(policy().evaluate(&snap), PolicyAction::None);
}

/// WHAT: Stopping after a long recording is not reported as stuck
/// WHY: Only the time spent waiting for the device to finalise counts
#[test]
fn given_stopping_briefly_after_long_recording_when_evaluating_then_none() {
    // Given: A 90s operation that entered Stopping a second ago
    let snap = CoordinatorSnapshot {
        phase_elapsed: Duration::from_secs(1),
        operation_elapsed: Some(Duration::from_secs(90)),
        ..snapshot(SessionPhase::Stopping)
    };

    // When/Then: Nothing to report
    assert_eq!(policy().evaluate(&snap), PolicyAction::None);
}

/// WHAT: Stopping that outlasts the stuck timeout is reported
/// WHY: A device that never finalises leaves no useful intent
#[test]
fn given_stopping_past_stuck_timeout_when_evaluating_then_report_stuck() {
    let snap = CoordinatorSnapshot {
        phase_elapsed: Duration::from_secs(61),
        operation_elapsed: Some(Duration::from_secs(400)),
        ..snapshot(SessionPhase::Stopping)
    };

    assert_eq!(
        policy().evaluate(&snap),
        PolicyAction::ReportStuck {
            phase: SessionPhase::Stopping
        }
    );
}
