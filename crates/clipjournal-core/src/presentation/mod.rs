mod arbiter;
mod slot;

pub use {
    arbiter::PresentationArbiter,
    slot::{PresentationSlot, SlotRendering},
};
