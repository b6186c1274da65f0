use bytemuck::{Pod, Zeroable};

use crate::error::HostError;

use super::AssetId;

/// Header prepended to decoded image payloads.
///
/// Written in native byte order so the engine can read it as three `u32`s
/// straight out of its own memory.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Pod, Zeroable)]
pub struct PixelHeader {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
}

impl PixelHeader {
    pub const SIZE: usize = std::mem::size_of::<PixelHeader>();

    /// Reads the header at the start of `bytes`, if there is room for one.
    pub fn read(bytes: &[u8]) -> Option<PixelHeader> {
        bytes.get(..Self::SIZE).map(bytemuck::pod_read_unaligned)
    }

    /// Byte length of the pixel data this header describes.
    pub fn pixel_len(&self) -> usize {
        self.width as usize * self.height as usize * self.channels as usize
    }
}

/// Decoded raster image laid out as `PixelHeader` followed by raw pixels.
///
/// Pixels are row-major, top row first, `channels` bytes per pixel. Once
/// committed the engine cannot tell this apart from a binary asset, so the
/// header is the only thing that marks it as an image.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedPixelBuffer {
    bytes: Vec<u8>,
}

impl AnnotatedPixelBuffer {
    /// RGBA8 is the only layout produced; it matches what a canvas readback gives.
    pub const CHANNELS: u32 = 4;

    /// Builds a buffer from tightly packed RGBA8 pixels.
    ///
    /// Returns `None` when `pixels` does not hold exactly `width * height` pixels.
    pub fn from_rgba8(width: u32, height: u32, pixels: &[u8]) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(Self::CHANNELS as usize)?;
        if pixels.len() != expected {
            return None;
        }

        let header = PixelHeader {
            width,
            height,
            channels: Self::CHANNELS,
        };

        let mut bytes = Vec::with_capacity(PixelHeader::SIZE + pixels.len());
        bytes.extend_from_slice(bytemuck::bytes_of(&header));
        bytes.extend_from_slice(pixels);
        Some(Self { bytes })
    }

    pub fn header(&self) -> PixelHeader {
        bytemuck::pod_read_unaligned(&self.bytes[..PixelHeader::SIZE])
    }

    pub fn pixels(&self) -> &[u8] {
        &self.bytes[PixelHeader::SIZE..]
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Decodes an encoded image (PNG, JPEG, ...) into an annotated RGBA8 buffer.
pub fn decode_image(id: &AssetId, encoded: &[u8]) -> Result<AnnotatedPixelBuffer, HostError> {
    let img = image::load_from_memory(encoded).map_err(|e| HostError::Decode {
        id: id.clone(),
        reason: e.to_string(),
    })?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    AnnotatedPixelBuffer::from_rgba8(width, height, rgba.as_raw()).ok_or_else(|| {
        HostError::Decode {
            id: id.clone(),
            reason: format!("pixel data does not match {width}x{height}"),
        }
    })
}
