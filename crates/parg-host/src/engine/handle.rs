use std::cell::RefCell;
use std::rc::Rc;

use crate::asset::AssetId;
use crate::surface::{ContextOptions, Surface};

use super::{ContextVersion, GraphicsContext};

/// Input event codes understood by the engine.
#[repr(u32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EventCode {
    Down = 0,
    Up = 1,
    Move = 2,
}

impl EventCode {
    #[inline]
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Capability set of a loaded engine module.
///
/// Memory transfer is a three-step protocol driven by the host:
/// `alloc` reserves `nbytes` at an offset into `memory_mut()`, the host copies
/// the payload there, then `commit` hands ownership of those bytes to the
/// engine. The host never calls `commit` without the copy.
pub trait Engine {
    /// Reserves `nbytes` of engine memory for `id` and returns its offset.
    fn alloc(&mut self, id: &AssetId, nbytes: usize) -> usize;

    /// Engine-owned memory region that offsets returned by `alloc` index into.
    fn memory_mut(&mut self) -> &mut [u8];

    /// Takes ownership of the bytes written at the last offset allocated for `id`.
    fn commit(&mut self, id: &AssetId);

    /// Preferred logical window size as `(width, height)`.
    fn preferred_window_size(&self) -> (u32, u32);

    fn create_context(
        &mut self,
        surface: &dyn Surface,
        version: ContextVersion,
        options: &ContextOptions,
    ) -> anyhow::Result<Box<dyn GraphicsContext>>;

    /// One-time engine setup with the host's opaque argument list.
    fn init(&mut self, args: &[String]);

    /// Advances engine time. Returns true when a redraw is needed.
    fn tick(&mut self, seconds: f64, pixel_density: f32) -> bool;

    fn draw(&mut self);

    /// Delivers one input event in normalized, bottom-left-origin coordinates.
    fn input(&mut self, code: EventCode, x: f32, y: f32, delta: f32);

    /// Called once when the host shuts down.
    fn dispose(&mut self) {}
}

/// A second engine that mirrors the primary engine's input.
///
/// Shared rather than owned: the host delivers input to it but never drives
/// its lifecycle.
pub type LinkedEngine = Rc<RefCell<dyn Engine>>;
