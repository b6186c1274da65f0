//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window and wires them to a `HostApp`.

mod runtime;
mod surface;

pub use runtime::{HostEvent, Runtime};
pub use surface::WindowSurface;
