mod clip;
mod operation;
mod state;

pub(crate) use operation::OperationIdGenerator;

pub use {
    clip::{CapturedClip, RecordedFile},
    operation::{OperationId, RecordOperation},
    state::{InvalidTransition, SessionEvent, SessionPhase, SessionState},
};
