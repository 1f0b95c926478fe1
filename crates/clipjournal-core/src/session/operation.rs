use std::{
    fmt,
    time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};

/// Identifier of one start-to-resolve capture operation.
///
/// Callbacks carry the id they were issued for so that completions from a
/// superseded operation can be told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperationId(u64);

impl OperationId {
    /// Creates an id from its raw value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op-{}", self.0)
    }
}

/// Monotonic source of operation ids. Never reuses a value.
#[derive(Debug, Default)]
pub(crate) struct OperationIdGenerator {
    last: u64,
}

impl OperationIdGenerator {
    pub(crate) fn next_id(&mut self) -> OperationId {
        self.last += 1;
        OperationId(self.last)
    }
}

/// The single in-flight capture operation.
///
/// Created when a start is accepted and dropped when the device resolves.
#[derive(Debug)]
pub struct RecordOperation {
    id: OperationId,
    active: bool,
    stop_requested: bool,
    discard: bool,
    created_at: Instant,
    recording_since: Option<Instant>,
}

impl RecordOperation {
    pub(crate) fn new(id: OperationId) -> Self {
        Self {
            id,
            active: true,
            stop_requested: false,
            discard: false,
            created_at: Instant::now(),
            recording_since: None,
        }
    }

    /// Id the device was given for this operation.
    pub fn id(&self) -> OperationId {
        self.id
    }

    /// Whether the device still owes a completion for this operation.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the device stop primitive has been issued.
    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    /// Whether the resolved file will be thrown away.
    pub fn marked_for_discard(&self) -> bool {
        self.discard
    }

    /// Time since the start was accepted.
    pub fn elapsed(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Sets the stop latch. Returns `true` only for the first call.
    pub(crate) fn latch_stop(&mut self) -> bool {
        if self.stop_requested {
            return false;
        }
        self.stop_requested = true;
        true
    }

    /// Sets the discard flag. Returns `true` only for the first call.
    pub(crate) fn mark_discard(&mut self) -> bool {
        if self.discard {
            return false;
        }
        self.discard = true;
        true
    }

    pub(crate) fn mark_recording(&mut self, at: Instant) {
        self.recording_since = Some(at);
    }

    /// Time spent recording since the device acknowledged the start.
    pub(crate) fn recorded_for(&self) -> Duration {
        self.recording_since
            .map(|since| since.elapsed())
            .unwrap_or_default()
    }

    pub(crate) fn finish(mut self) -> Self {
        self.active = false;
        self
    }
}
