use crate::{CoreError, Zone, ZoneThresholds};

/// WHAT: Default thresholds split the screen 20/60/20
/// WHY: Left margin cancels, right margin commits, centre holds
#[test]
fn given_default_thresholds_when_classifying_then_margins_map_to_actions() {
    // Given: Default thresholds
    let thresholds = ZoneThresholds::default();

    // When/Then: Each region maps to its zone, boundaries belong to Hold
    assert_eq!(thresholds.classify(0.05), Zone::Cancel);
    assert_eq!(thresholds.classify(0.2), Zone::Hold);
    assert_eq!(thresholds.classify(0.5), Zone::Hold);
    assert_eq!(thresholds.classify(0.8), Zone::Hold);
    assert_eq!(thresholds.classify(0.95), Zone::Commit);
}

/// WHAT: Off-screen and non-finite positions are handled safely
/// WHY: Pointer coordinates can overshoot the surface during fast swipes
#[test]
fn given_out_of_range_positions_when_classifying_then_clamped_or_hold() {
    let thresholds = ZoneThresholds::default();

    assert_eq!(thresholds.classify(-0.5), Zone::Cancel);
    assert_eq!(thresholds.classify(1.7), Zone::Commit);
    assert_eq!(thresholds.classify(f32::NAN), Zone::Hold);
}

/// WHAT: Inverted or out-of-range thresholds are rejected
/// WHY: A misconfigured split could make Cancel and Commit overlap
#[test]
fn given_invalid_fractions_when_creating_thresholds_then_invalid_thresholds_error() {
    assert!(matches!(
        ZoneThresholds::new(0.8, 0.2),
        Err(CoreError::InvalidThresholds { .. })
    ));
    assert!(matches!(
        ZoneThresholds::new(0.5, 0.5),
        Err(CoreError::InvalidThresholds { .. })
    ));
    assert!(matches!(
        ZoneThresholds::new(-0.1, 0.8),
        Err(CoreError::InvalidThresholds { .. })
    ));
}

/// WHAT: Custom thresholds move the zone boundaries
/// WHY: The split is configurable per device form factor
#[test]
#[allow(clippy::unwrap_used)]
fn given_custom_thresholds_when_classifying_then_custom_boundaries_apply() {
    let thresholds = ZoneThresholds::new(0.3, 0.6).unwrap();

    assert_eq!(thresholds.classify(0.25), Zone::Cancel);
    assert_eq!(thresholds.classify(0.65), Zone::Commit);
    assert_eq!(thresholds.cancel_fraction(), 0.3);
    assert_eq!(thresholds.commit_fraction(), 0.6);
}
