use crate::surface::{ContextOptions, OptionValue};

/// Initialization parameters for the GPU layer.
///
/// Usually derived from the host's `ContextOptions` with [`GpuInit::from_options`].
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// MSAA sample count for the color target. Falls back to 1 when unsupported.
    pub sample_count: u32,

    /// Required wgpu features.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface. A hint.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            sample_count: 1,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

impl GpuInit {
    /// Maps context capability flags onto surface parameters.
    ///
    /// `alpha` selects a premultiplied or opaque compositor mode and
    /// `antialias` requests 4x MSAA. Recognized extras: `srgb` (bool),
    /// `vsync` (bool) and `frame_latency` (number). Unknown extras are ignored.
    pub fn from_options(options: &ContextOptions) -> Self {
        let mut init = Self {
            alpha_mode: Some(if options.alpha {
                wgpu::CompositeAlphaMode::PreMultiplied
            } else {
                wgpu::CompositeAlphaMode::Opaque
            }),
            sample_count: if options.antialias { 4 } else { 1 },
            ..Self::default()
        };

        if let Some(srgb) = options.get("srgb").and_then(OptionValue::as_bool) {
            init.prefer_srgb = srgb;
        }
        if let Some(vsync) = options.get("vsync").and_then(OptionValue::as_bool) {
            init.present_mode = if vsync {
                wgpu::PresentMode::Fifo
            } else {
                wgpu::PresentMode::AutoNoVsync
            };
        }
        if let Some(latency) = options.get("frame_latency").and_then(OptionValue::as_number) {
            init.desired_maximum_frame_latency = latency.max(1.0) as u32;
        }
        init
    }
}
