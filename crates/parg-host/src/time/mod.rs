//! Time subsystem.
//!
//! - `FrameClock` samples monotonic time once per frame
//! - `FrameScheduler` turns each sample into an engine tick and, when due, a draw

mod frame_clock;
mod scheduler;

pub use frame_clock::{FrameClock, FrameTime};
pub use scheduler::{DrawPolicy, FrameReport, FrameScheduler};
