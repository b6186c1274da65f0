use std::sync::Arc;

use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::engine::{FrameCapture, RowOrder};
use crate::paint::Color;

use super::surface::{self, ReadbackLayout};
use super::GpuInit;

/// Owns wgpu core objects and the surface configuration for one window.
///
/// The window is shared, so the surface is `'static` and can live inside an
/// engine independently of the host's window bookkeeping.
pub struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels.
    size: PhysicalSize<u32>,

    sample_count: u32,
    /// Multisampled color target, present when `sample_count > 1`.
    msaa_view: Option<wgpu::TextureView>,

    /// Set when the surface can be copied from and read back as RGBA8.
    readback: Option<ReadbackLayout>,
    capture_requested: bool,
    captured: Option<FrameCapture>,
}

/// Staging buffer for one frame readback.
struct Readback {
    buffer: wgpu::Buffer,
    width: u32,
    height: u32,
    padded_row: u32,
}

/// Represents a single acquired frame.
///
/// Short-lived; holding the surface texture prevents acquisition of
/// subsequent frames.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}

impl Gpu {
    /// Creates a GPU context bound to `window`.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu; callers on the
    /// event loop thread block on it with `pollster`.
    pub async fn new(window: Arc<Window>, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        let GpuInit {
            prefer_srgb,
            present_mode,
            alpha_mode,
            sample_count,
            required_features,
            required_limits,
            desired_maximum_frame_latency,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("parg-host device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps.formats, prefer_srgb)
            .context("no supported surface formats")?;
        let alpha_mode = surface::choose_alpha_mode(&caps.alpha_modes, alpha_mode);

        let sample_count = if sample_count > 1
            && adapter
                .get_texture_format_features(format)
                .flags
                .sample_count_supported(sample_count)
        {
            sample_count
        } else {
            if sample_count > 1 {
                log::warn!("{sample_count}x MSAA unsupported for {format:?}, rendering without");
            }
            1
        };

        let readback = surface::readback_layout(format)
            .filter(|_| caps.usages.contains(wgpu::TextureUsages::COPY_SRC));
        let usage = if readback.is_some() {
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC
        } else {
            wgpu::TextureUsages::RENDER_ATTACHMENT
        };

        let config = wgpu::SurfaceConfiguration {
            usage,
            format,
            width: size.width,
            height: size.height,
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);
        log::debug!(
            "configured {format:?} surface {}x{}, {alpha_mode:?}, {sample_count}x",
            size.width,
            size.height
        );

        let mut gpu = Self {
            window,
            surface,
            device,
            queue,
            config,
            size,
            sample_count,
            msaa_view: None,
            readback,
            capture_requested: false,
            captured: None,
        };
        gpu.rebuild_msaa();
        Ok(gpu)
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Returns the active surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Returns the current drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Reconfigures the surface after a resize.
    ///
    /// wgpu cannot configure a 0x0 surface; configuration is deferred then.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if surface::apply_resize(
            &self.surface,
            &self.device,
            &mut self.config,
            &mut self.size,
            new_size,
        ) {
            self.rebuild_msaa();
        }
    }

    /// Follows the window's current inner size.
    pub fn sync_size(&mut self) {
        let inner = self.window.inner_size();
        if inner != self.size {
            self.resize(inner);
        }
    }

    fn rebuild_msaa(&mut self) {
        if self.sample_count <= 1 {
            self.msaa_view = None;
            return;
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("parg msaa target"),
            size: wgpu::Extent3d {
                width: self.config.width,
                height: self.config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: self.sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: self.config.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        self.msaa_view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
    }

    /// Acquires the next surface texture and creates an encoder.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("parg frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands and presents the frame.
    ///
    /// When a capture is pending the frame is copied out before it is
    /// presented.
    pub fn submit(&mut self, mut frame: GpuFrame) {
        let readback = match self.readback {
            Some(_) if self.capture_requested => Some(self.encode_readback(&mut frame)),
            _ => None,
        };

        self.queue.submit(std::iter::once(frame.encoder.finish()));

        if let Some(readback) = readback {
            self.capture_requested = false;
            match self.finish_readback(readback) {
                Ok(capture) => self.captured = Some(capture),
                Err(e) => log::error!("frame readback failed: {e:#}"),
            }
        }

        self.window.pre_present_notify();
        drop(frame.view);
        frame.surface_texture.present();
    }

    /// Keeps a copy of the next presented frame.
    ///
    /// Returns false when the surface format or platform rules out readback.
    pub fn request_capture(&mut self) -> bool {
        self.capture_requested = self.readback.is_some();
        self.capture_requested
    }

    pub fn take_capture(&mut self) -> Option<FrameCapture> {
        self.captured.take()
    }

    fn encode_readback(&self, frame: &mut GpuFrame) -> Readback {
        let texture = &frame.surface_texture.texture;
        let (width, height) = (texture.width(), texture.height());
        let padded_row = surface::padded_bytes_per_row(width);

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("parg capture readback"),
            size: u64::from(padded_row) * u64::from(height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        frame.encoder.copy_texture_to_buffer(
            texture.as_image_copy(),
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: None,
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        Readback {
            buffer,
            width,
            height,
            padded_row,
        }
    }

    /// Blocks until the copy lands, then unpacks it into top-down RGBA rows.
    fn finish_readback(&self, readback: Readback) -> Result<FrameCapture> {
        let layout = self.readback.context("surface does not support readback")?;
        let slice = readback.buffer.slice(..);

        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device
            .poll(wgpu::PollType::wait_indefinitely())
            .context("device poll failed")?;
        rx.recv()
            .context("readback callback dropped")?
            .context("failed to map readback buffer")?;

        let rgba = {
            let data = slice.get_mapped_range();
            surface::unpack_readback(
                &data,
                readback.padded_row as usize,
                readback.width as usize,
                readback.height as usize,
                layout,
            )
        };
        readback.buffer.unmap();

        Ok(FrameCapture {
            width: readback.width,
            height: readback.height,
            rows: RowOrder::TopDown,
            rgba,
        })
    }

    /// Clears the whole surface to `color` and presents it.
    ///
    /// With MSAA active the multisampled target is cleared and resolved into
    /// the surface texture.
    pub fn clear(&mut self, color: Color) -> std::result::Result<(), SurfaceErrorAction> {
        self.sync_size();
        if self.size.width == 0 || self.size.height == 0 {
            return Err(SurfaceErrorAction::SkipFrame);
        }

        let mut frame = match self.begin_frame() {
            Ok(f) => f,
            Err(err) => return Err(self.handle_surface_error(err)),
        };

        let (view, resolve_target) = match &self.msaa_view {
            Some(msaa) => (msaa, Some(&frame.view)),
            None => (&frame.view, None),
        };

        // Clear pass; dropped before the encoder is moved into submit().
        {
            let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("parg clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(color.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        self.submit(frame);
        Ok(())
    }

    /// Converts a `SurfaceError` into a higher-level action.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        surface::map_surface_error(&self.surface, &self.device, &self.config, self.size, err)
    }
}
