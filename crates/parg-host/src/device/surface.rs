use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        if let Some(f) = preferred.into_iter().find(|f| formats.contains(f)) {
            return Some(f);
        }
    }

    formats.first().copied()
}

pub(crate) fn choose_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| supported.contains(m))
        .or_else(|| supported.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Returns true when the surface was reconfigured.
pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) -> bool {
    *size = new_size;
    if new_size.width == 0 || new_size.height == 0 {
        return false;
    }

    config.width = new_size.width;
    config.height = new_size.height;
    surface.configure(device, config);
    true
}

pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            if size.width > 0 && size.height > 0 {
                surface.configure(device, config);
            }
            SurfaceErrorAction::Reconfigured
        }
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout => SurfaceErrorAction::SkipFrame,
        wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

/// Channel order of a surface format that can be read back as RGBA8.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum ReadbackLayout {
    Rgba,
    Bgra,
}

pub(crate) fn readback_layout(format: wgpu::TextureFormat) -> Option<ReadbackLayout> {
    use wgpu::TextureFormat as F;
    match format {
        F::Rgba8Unorm | F::Rgba8UnormSrgb => Some(ReadbackLayout::Rgba),
        F::Bgra8Unorm | F::Bgra8UnormSrgb => Some(ReadbackLayout::Bgra),
        _ => None,
    }
}

/// Row pitch of a 4-byte texel copy, padded to `COPY_BYTES_PER_ROW_ALIGNMENT`.
pub(crate) fn padded_bytes_per_row(width: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    (width * 4).div_ceil(align) * align
}

/// Strips the copy padding from each row and reorders channels to RGBA.
pub(crate) fn unpack_readback(
    data: &[u8],
    padded_row: usize,
    width: usize,
    height: usize,
    layout: ReadbackLayout,
) -> Vec<u8> {
    let row = width * 4;
    let mut rgba = Vec::with_capacity(row * height);
    for line in data.chunks(padded_row).take(height) {
        rgba.extend_from_slice(&line[..row]);
    }
    if layout == ReadbackLayout::Bgra {
        for px in rgba.chunks_exact_mut(4) {
            px.swap(0, 2);
        }
    }
    rgba
}

#[cfg(test)]
mod tests {
    use wgpu::{CompositeAlphaMode, TextureFormat};

    use super::*;

    #[test]
    fn srgb_preferred_when_present() {
        let formats = [TextureFormat::Bgra8Unorm, TextureFormat::Rgba8UnormSrgb];
        assert_eq!(
            choose_surface_format(&formats, true),
            Some(TextureFormat::Rgba8UnormSrgb)
        );
        assert_eq!(
            choose_surface_format(&formats, false),
            Some(TextureFormat::Bgra8Unorm)
        );
        assert_eq!(choose_surface_format(&[], true), None);
    }

    #[test]
    fn unsupported_alpha_falls_back() {
        let supported = [CompositeAlphaMode::Opaque];
        assert_eq!(
            choose_alpha_mode(&supported, Some(CompositeAlphaMode::PreMultiplied)),
            CompositeAlphaMode::Opaque
        );
        assert_eq!(choose_alpha_mode(&[], None), CompositeAlphaMode::Auto);
    }

    // ── readback ───────────────────────────────────────────────────

    #[test]
    fn readback_rows_are_aligned() {
        assert_eq!(padded_bytes_per_row(1), 256);
        assert_eq!(padded_bytes_per_row(64), 256);
        assert_eq!(padded_bytes_per_row(65), 512);
    }

    #[test]
    fn readback_only_for_eight_bit_colour() {
        assert_eq!(readback_layout(TextureFormat::Rgba8UnormSrgb), Some(ReadbackLayout::Rgba));
        assert_eq!(readback_layout(TextureFormat::Bgra8Unorm), Some(ReadbackLayout::Bgra));
        assert_eq!(readback_layout(TextureFormat::Rgba16Float), None);
    }

    #[test]
    fn unpack_strips_padding_and_swaps_bgra() {
        // 2x2 image, rows padded to 12 bytes
        let data = [
            1, 2, 3, 4, 5, 6, 7, 8, 0, 0, 0, 0, //
            9, 10, 11, 12, 13, 14, 15, 16, 0, 0, 0, 0,
        ];

        assert_eq!(
            unpack_readback(&data, 12, 2, 2, ReadbackLayout::Rgba),
            vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16]
        );
        assert_eq!(
            unpack_readback(&data, 12, 2, 2, ReadbackLayout::Bgra),
            vec![3, 2, 1, 4, 7, 6, 5, 8, 11, 10, 9, 12, 15, 14, 13, 16]
        );
    }
}
