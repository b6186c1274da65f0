use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};

use crate::engine::{ContextVersion, FrameCapture, GraphicsContext};
use crate::paint::Color;
use crate::surface::{ContextOptions, Surface};

use super::{Gpu, GpuInit, SurfaceErrorAction};

/// wgpu-backed `GraphicsContext` for engines that draw into a host window.
///
/// The `Gpu` is shared so the engine can keep drawing through it after handing
/// the context back to the host.
#[derive(Clone)]
pub struct GpuContext {
    gpu: Rc<RefCell<Gpu>>,
}

impl GpuContext {
    /// Creates a context on the surface's native window.
    ///
    /// Fails when the surface has no window, or when no adapter or device
    /// satisfying `options` is available.
    pub fn create(
        surface: &dyn Surface,
        version: ContextVersion,
        options: &ContextOptions,
    ) -> Result<Self> {
        let window = surface
            .window()
            .context("surface is not backed by a native window")?;

        log::debug!("creating wgpu context for version {}.{}", version.major, version.minor);
        let gpu = pollster::block_on(Gpu::new(window, GpuInit::from_options(options)))?;

        Ok(Self {
            gpu: Rc::new(RefCell::new(gpu)),
        })
    }

    pub fn gpu(&self) -> Rc<RefCell<Gpu>> {
        self.gpu.clone()
    }
}

impl GraphicsContext for GpuContext {
    fn clear(&mut self, color: Color) {
        match self.gpu.borrow_mut().clear(color) {
            Ok(()) | Err(SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame) => {}
            Err(SurfaceErrorAction::Fatal) => log::error!("surface lost while clearing"),
        }
    }

    fn request_capture(&mut self) -> bool {
        self.gpu.borrow_mut().request_capture()
    }

    fn take_capture(&mut self) -> Option<FrameCapture> {
        self.gpu.borrow_mut().take_capture()
    }
}
