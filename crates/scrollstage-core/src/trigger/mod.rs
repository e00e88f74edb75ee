//! Progress triggers
//!
//! Each trigger binds a scroll range to an anchor element and turns the
//! current virtual offset into a clamped progress in [0, 1], emitting
//! lifecycle events when the range boundaries are crossed.

mod position;
mod registry;

pub use position::{Edge, EndBound, Position};
pub use registry::{
    Region, Trigger, TriggerDef, TriggerEvent, TriggerEventKind, TriggerId, TriggerRegistry,
    TriggerState,
};
