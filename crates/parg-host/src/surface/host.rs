use std::sync::Arc;

use winit::window::Window;

use crate::coords::Rect;

/// The host-side drawing target.
///
/// Implemented by the winit window in `window` and by test doubles.
pub trait Surface {
    /// Device pixels per logical pixel. Read live; may change between calls.
    fn pixel_density(&self) -> f32;

    /// Sets the on-screen (logical) size.
    fn set_logical_size(&mut self, width: u32, height: u32);

    /// Sets the backing-store size in device pixels.
    fn set_backing_size(&mut self, width: u32, height: u32);

    /// Current client area size in logical pixels.
    fn client_size(&self) -> (f32, f32);

    /// Client area bounds in the coordinate space pointer events are reported in.
    fn bounding_box(&self) -> Rect;

    fn show(&mut self);

    /// Native window backing this surface, if any.
    fn window(&self) -> Option<Arc<Window>> {
        None
    }
}
