//! Input subsystem.
//!
//! Platform events are translated into `PointerEvent`s (see `platform`), then
//! the `InputRouter` normalizes them and forwards them to the engine(s).

pub mod platform;
mod router;
mod types;

pub use router::{EngineInput, InputRouter, InteractionGate, RouteOutcome};
pub use types::{PointerEvent, PointerKind, WheelDelta};
