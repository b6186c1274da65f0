//! Engine boundary.
//!
//! The engine is an opaque, precompiled module. The host only sees the
//! capability set below; everything behind it (rendering, simulation, asset
//! parsing) is the engine's business.

mod context;
mod handle;

pub use context::{ContextVersion, FrameCapture, GraphicsContext, RowOrder};
pub use handle::{Engine, EventCode, LinkedEngine};
