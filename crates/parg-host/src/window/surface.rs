use std::sync::Arc;

use winit::dpi::{LogicalSize, PhysicalSize};
use winit::window::Window;

use crate::coords::Rect;
use crate::surface::Surface;

/// `Surface` over a winit window.
///
/// Windows are created hidden and only shown once the engine has a context.
/// Only the logical size is requested from the window system; the device-pixel
/// size follows from it and the scale factor.
pub struct WindowSurface {
    window: Arc<Window>,
    requested: Option<(u32, u32)>,
}

impl WindowSurface {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            requested: None,
        }
    }

    pub fn inner(&self) -> &Arc<Window> {
        &self.window
    }
}

impl Surface for WindowSurface {
    fn pixel_density(&self) -> f32 {
        self.window.scale_factor() as f32
    }

    fn set_logical_size(&mut self, width: u32, height: u32) {
        self.requested = Some((width, height));
        let _ = self.window.request_inner_size(LogicalSize::new(width, height));
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        let actual = self.window.inner_size();
        if actual != PhysicalSize::new(width, height) {
            log::debug!(
                "backing store is {}x{}, expected {width}x{height}",
                actual.width,
                actual.height
            );
        }
    }

    fn client_size(&self) -> (f32, f32) {
        let measured: LogicalSize<f32> =
            self.window.inner_size().to_logical(self.window.scale_factor());
        client_size(self.requested, (measured.width, measured.height))
    }

    /// Pointer positions are window-relative, so the box sits at the origin.
    fn bounding_box(&self) -> Rect {
        let (w, h) = self.client_size();
        Rect::from_size(w, h)
    }

    fn show(&mut self) {
        self.window.set_visible(true);
        self.window.request_redraw();
    }

    fn window(&self) -> Option<Arc<Window>> {
        Some(self.window.clone())
    }
}

/// Reports the requested logical size when the measured one only differs by
/// device-pixel rounding (333 logical at 1.5 measures as 332.67).
fn client_size(requested: Option<(u32, u32)>, measured: (f32, f32)) -> (f32, f32) {
    let Some((w, h)) = requested else {
        return measured;
    };
    let (w, h) = (w as f32, h as f32);
    if (measured.0 - w).abs() < 1.0 && (measured.1 - h).abs() < 1.0 {
        (w, h)
    } else {
        measured
    }
}
