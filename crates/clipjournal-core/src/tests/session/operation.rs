use crate::session::{OperationIdGenerator, RecordOperation};

/// WHAT: The stop latch only opens once
/// WHY: The device stop primitive must run exactly once per operation
#[test]
fn given_new_operation_when_latching_stop_twice_then_second_latch_refused() {
    // Given: A fresh active operation
    let mut ids = OperationIdGenerator::default();
    let mut op = RecordOperation::new(ids.next_id());
    assert!(op.is_active());
    assert!(!op.stop_requested());

    // When: Latching twice
    let first = op.latch_stop();
    let second = op.latch_stop();

    // Then: Only the first latch succeeds
    assert!(first);
    assert!(!second);
    assert!(op.stop_requested());
}

/// WHAT: The discard flag only reports the first mark
/// WHY: Duplicate cancels must be distinguishable from the first one
#[test]
fn given_operation_when_marking_discard_twice_then_second_mark_refused() {
    // Given: A fresh active operation
    let mut ids = OperationIdGenerator::default();
    let mut op = RecordOperation::new(ids.next_id());

    // When/Then: First mark succeeds, second does not
    assert!(op.mark_discard());
    assert!(!op.mark_discard());
    assert!(op.marked_for_discard());
}

/// WHAT: Generated ids never repeat
/// WHY: Stale callbacks are detected by id mismatch
#[test]
fn given_generator_when_issuing_ids_then_each_is_unique_and_increasing() {
    // Given: A generator
    let mut ids = OperationIdGenerator::default();

    // When: Issuing three ids
    let a = ids.next_id();
    let b = ids.next_id();
    let c = ids.next_id();

    // Then: Strictly increasing
    assert!(a < b && b < c);
    assert_eq!(a.to_string(), "op-1");
}

/// WHAT: Finishing an operation clears its active flag
/// WHY: Inactive operations no longer block slot transfers
#[test]
fn given_active_operation_when_finished_then_inactive() {
    let mut ids = OperationIdGenerator::default();
    let op = RecordOperation::new(ids.next_id()).finish();
    assert!(!op.is_active());
}
