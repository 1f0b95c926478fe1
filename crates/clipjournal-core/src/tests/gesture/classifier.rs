use crate::{CoreError, GestureClassifier, GestureConfig, GestureEvent, Point, Zone};

use std::time::{Duration, Instant};

const WIDTH: f32 = 400.0;

#[allow(clippy::unwrap_used)]
fn classifier() -> GestureClassifier {
    GestureClassifier::new(GestureConfig::for_width(WIDTH)).unwrap()
}

fn at(fraction: f32) -> Point {
    Point::new(WIDTH * fraction, 300.0)
}

/// WHAT: Dragging from centre into the left margin and releasing cancels
/// WHY: Release must emit exactly one action matching the held zone
#[test]
fn given_recording_when_dragged_to_cancel_zone_and_released_then_single_cancel_action() {
    // Given: A touch at 50% during a recording
    let mut gestures = classifier();
    let t0 = Instant::now();
    gestures.pointer_down(at(0.5), t0);

    // When: Moving to 10% and releasing before the long-press timer
    let mut events = Vec::new();
    events.extend(gestures.pointer_move(at(0.3), true, t0 + Duration::from_millis(50)));
    events.extend(gestures.pointer_move(at(0.1), true, t0 + Duration::from_millis(100)));
    events.extend(gestures.pointer_up(t0 + Duration::from_millis(150)));

    // Then: One zone change, then exactly one Cancel action
    assert_eq!(
        events,
        vec![
            GestureEvent::ZoneChanged(Zone::Cancel),
            GestureEvent::Action(Zone::Cancel)
        ]
    );
    assert!(!gestures.is_tracking());
}

/// WHAT: Zone changes fire once per crossing, not per move event
/// WHY: Haptic feedback must trigger exactly once per boundary
#[test]
fn given_drag_when_moving_within_and_across_zones_then_only_crossings_emit() {
    // Given: An engaged drag at centre
    let mut gestures = classifier();
    let t0 = Instant::now();
    gestures.pointer_down(at(0.5), t0);
    let t = t0 + Duration::from_millis(10);

    // When: Moving around inside Commit, back to Hold
    let events: Vec<_> = [0.55, 0.85, 0.9, 0.95, 0.6, 0.65]
        .into_iter()
        .filter_map(|x| gestures.pointer_move(at(x), true, t))
        .collect();

    // Then: Only two crossings reported
    assert_eq!(
        events,
        vec![
            GestureEvent::ZoneChanged(Zone::Commit),
            GestureEvent::ZoneChanged(Zone::Hold)
        ]
    );
    assert_eq!(gestures.current_zone(), Some(Zone::Hold));
}

/// WHAT: An interrupted drag resolves to Hold
/// WHY: An ambiguous interruption must never delete or save
#[test]
fn given_drag_in_commit_zone_when_pointer_lost_then_hold_action() {
    // Given: A drag held in the Commit zone
    let mut gestures = classifier();
    let t0 = Instant::now();
    gestures.pointer_down(at(0.5), t0);
    let _ = gestures.pointer_move(at(0.95), true, t0 + Duration::from_millis(20));

    // When: The platform loses the pointer
    let event = gestures.pointer_lost();

    // Then: Hold, and the touch is over
    assert_eq!(event, Some(GestureEvent::Action(Zone::Hold)));
    assert!(!gestures.is_tracking());
}

/// WHAT: Holding still past the timer emits one LongPressComplete
/// WHY: Long press drives start and pause toggling
#[test]
fn given_still_touch_when_timer_expires_then_single_long_press_and_no_action() {
    // Given: A touch that does not move
    let mut gestures = classifier();
    let t0 = Instant::now();
    gestures.pointer_down(at(0.5), t0);

    // When: Ticking before and after expiry, then releasing
    let early = gestures.tick(t0 + Duration::from_millis(499));
    let fired = gestures.tick(t0 + Duration::from_millis(500));
    let again = gestures.tick(t0 + Duration::from_millis(900));
    let released = gestures.pointer_up(t0 + Duration::from_millis(1000));

    // Then: Exactly one long press, no terminal action
    assert_eq!(early, None);
    assert_eq!(fired, Some(GestureEvent::LongPressComplete));
    assert_eq!(again, None);
    assert_eq!(released, None);
}

/// WHAT: Releasing before expiry cancels the long-press timer
/// WHY: A tap must not start or pause a recording
#[test]
fn given_short_tap_when_released_then_nothing_emitted() {
    let mut gestures = classifier();
    let t0 = Instant::now();
    gestures.pointer_down(at(0.5), t0);

    let released = gestures.pointer_up(t0 + Duration::from_millis(120));
    let late_tick = gestures.tick(t0 + Duration::from_millis(800));

    assert_eq!(released, None);
    assert_eq!(late_tick, None);
}

/// WHAT: After the long press fires, zone classification is suppressed
/// WHY: Long press and zone drag are mutually exclusive per touch
#[test]
fn given_long_press_fired_when_dragging_to_cancel_then_no_zone_events() {
    // Given: A long press that already fired
    let mut gestures = classifier();
    let t0 = Instant::now();
    gestures.pointer_down(at(0.5), t0);
    let _ = gestures.tick(t0 + Duration::from_millis(600));

    // When: Dragging into the Cancel zone and releasing
    let moved = gestures.pointer_move(at(0.05), true, t0 + Duration::from_millis(700));
    let released = gestures.pointer_up(t0 + Duration::from_millis(800));

    // Then: Nothing is emitted
    assert_eq!(moved, None);
    assert_eq!(released, None);
}

/// WHAT: Once a drag engages, the long-press timer is disarmed
/// WHY: Long press and zone drag are mutually exclusive per touch
#[test]
fn given_engaged_drag_when_timer_would_expire_then_no_long_press() {
    // Given: A drag engaged early in the touch
    let mut gestures = classifier();
    let t0 = Instant::now();
    gestures.pointer_down(at(0.5), t0);
    let _ = gestures.pointer_move(at(0.6), true, t0 + Duration::from_millis(30));

    // When: Time passes beyond the long-press duration
    let fired = gestures.tick(t0 + Duration::from_secs(2));
    let released = gestures.pointer_up(t0 + Duration::from_secs(2));

    // Then: No long press; release reports the held zone
    assert_eq!(fired, None);
    assert_eq!(released, Some(GestureEvent::Action(Zone::Hold)));
}

/// WHAT: Movement outside a recording never classifies zones
/// WHY: Zones only apply while a recording is active
#[test]
fn given_not_recording_when_dragging_then_no_zone_events() {
    let mut gestures = classifier();
    let t0 = Instant::now();
    gestures.pointer_down(at(0.5), t0);

    let moved = gestures.pointer_move(at(0.05), false, t0 + Duration::from_millis(40));
    let released = gestures.pointer_up(t0 + Duration::from_millis(80));

    assert_eq!(moved, None);
    assert_eq!(released, None);
}

/// WHAT: Jitter inside the drag slop does not engage zones
/// WHY: A finger resting on the glass still wobbles a few pixels
#[test]
fn given_small_jitter_when_recording_then_long_press_still_possible() {
    let mut gestures = classifier();
    let t0 = Instant::now();
    gestures.pointer_down(at(0.5), t0);

    let moved = gestures.pointer_move(Point::new(WIDTH * 0.5 + 4.0, 300.0), true, t0);
    let fired = gestures.tick(t0 + Duration::from_millis(500));

    assert_eq!(moved, None);
    assert_eq!(fired, Some(GestureEvent::LongPressComplete));
}

/// WHAT: Invalid surface sizes are rejected at construction
/// WHY: Zone fractions are undefined for a zero-width surface
#[test]
fn given_zero_width_when_creating_classifier_then_invalid_thresholds_error() {
    let result = GestureClassifier::new(GestureConfig::for_width(0.0));
    assert!(matches!(result, Err(CoreError::InvalidThresholds { .. })));
}
