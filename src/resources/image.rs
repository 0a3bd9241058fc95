//! CPU-side image data and texture level preparation.
//!
//! Decoded images are converted to RGBA8 level 0, optionally with the alpha
//! channel remapped so alpha-tested edges survive minification, and then
//! downsampled into a mip chain on the CPU when the destination cannot
//! generate mips itself (atlas regions).

use crate::errors::{Error, Result};

/// Decoded 8-bit-per-channel image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    /// 3 (RGB) or 4 (RGBA).
    pub components: u32,
    pub pixels: Vec<u8>,
}

impl ImageData {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// One mip level of texture data, tightly packed rows of `stride` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipLevel {
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub data: Vec<u8>,
}

/// Remaps one alpha value for alpha-tested mip generation:
/// `max(a, min(a / 3 + 2/3 * cutoff * 255, 255))`.
///
/// The result is never below the input.
#[inline]
#[must_use]
pub fn remap_alpha(alpha: u8, cutoff: f32) -> u8 {
    let threshold = cutoff * 255.0;
    let remapped = (f32::from(alpha) / 3.0 + 2.0 / 3.0 * threshold).min(255.0);
    alpha.max(remapped as u8)
}

/// Builds RGBA8 level 0 (plus `mip_count - 1` CPU-generated levels) from a
/// decoded image.
///
/// `alpha_cutoff > 0` remaps the alpha of RGBA sources; RGB sources get
/// opaque alpha.
pub fn prepare_texture_levels(
    image: &ImageData,
    alpha_cutoff: f32,
    mip_count: u32,
) -> Result<Vec<MipLevel>> {
    if image.is_empty() {
        return Err(Error::ImageDecode("image has zero size".to_string()));
    }

    let pixel_count = image.width as usize * image.height as usize;
    let expected = pixel_count * image.components as usize;
    if image.pixels.len() < expected {
        return Err(Error::ImageDecode(format!(
            "image data is {} bytes, expected {expected}",
            image.pixels.len()
        )));
    }
    let src = &image.pixels[..expected];

    let data = match image.components {
        3 => {
            let mut rgba = Vec::with_capacity(pixel_count * 4);
            for rgb in src.chunks_exact(3) {
                rgba.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
            }
            rgba
        }
        4 if alpha_cutoff > 0.0 => {
            let cutoff = alpha_cutoff.min(1.0);
            let mut rgba = src.to_vec();
            for pixel in rgba.chunks_exact_mut(4) {
                pixel[3] = remap_alpha(pixel[3], cutoff);
            }
            rgba
        }
        4 => src.to_vec(),
        n => {
            return Err(Error::UnsupportedFeature(format!(
                "images with {n} color components"
            )));
        }
    };

    let mut levels = Vec::with_capacity(mip_count.max(1) as usize);
    levels.push(MipLevel {
        width: image.width,
        height: image.height,
        stride: image.width * 4,
        data,
    });

    generate_mip_levels(&mut levels, mip_count, wgpu::TextureFormat::Rgba8Unorm)?;
    Ok(levels)
}

/// Appends box-filtered levels to `levels` until it holds `mip_count`.
///
/// Each level is half the previous one (at least 1) aligned up to the
/// format's block size, so a chain longer than the finest resolution ends in
/// 1x1 levels. Only uncompressed 4-byte-per-texel formats can be filtered.
pub fn generate_mip_levels(
    levels: &mut Vec<MipLevel>,
    mip_count: u32,
    format: wgpu::TextureFormat,
) -> Result<()> {
    let mip_count = mip_count as usize;
    if levels.is_empty() || levels.len() >= mip_count {
        return Ok(());
    }

    if format.is_compressed() {
        return Err(Error::UnsupportedFeature(format!(
            "mip generation for compressed format {format:?}"
        )));
    }
    let (block_width, block_height) = format.block_dimensions();
    let texel_size = format.block_copy_size(None).unwrap_or(0);
    if texel_size != 4 {
        return Err(Error::UnsupportedFeature(format!(
            "CPU mip generation for format {format:?}"
        )));
    }

    while levels.len() < mip_count {
        let fine = &levels[levels.len() - 1];
        let width = (fine.width / 2).max(1).next_multiple_of(block_width);
        let height = (fine.height / 2).max(1).next_multiple_of(block_height);
        let stride = width / block_width * texel_size;

        let mut data = vec![0u8; stride as usize * (height / block_height) as usize];
        downsample_box(fine, width, height, stride, &mut data);

        levels.push(MipLevel {
            width,
            height,
            stride,
            data,
        });
    }

    Ok(())
}

fn texel(level: &MipLevel, x: u32, y: u32) -> &[u8] {
    let x = x.min(level.width.saturating_sub(1));
    let y = y.min(level.height.saturating_sub(1));
    let offset = (y * level.stride + x * 4) as usize;
    &level.data[offset..offset + 4]
}

fn downsample_box(fine: &MipLevel, width: u32, height: u32, stride: u32, out: &mut [u8]) {
    for y in 0..height {
        for x in 0..width {
            let (x0, y0) = (x * 2, y * 2);
            let samples = [
                texel(fine, x0, y0),
                texel(fine, x0 + 1, y0),
                texel(fine, x0, y0 + 1),
                texel(fine, x0 + 1, y0 + 1),
            ];
            let dst = (y * stride + x * 4) as usize;
            for c in 0..4 {
                let sum: u32 = samples.iter().map(|s| u32::from(s[c])).sum();
                out[dst + c] = ((sum + 2) / 4) as u8;
            }
        }
    }
}

pub const CHECKERBOARD_SIZE: u32 = 32;
const CHECKERBOARD_CELL: u32 = 4;

/// 32x32 RGBA8 black/white checkerboard with 4x4 cells, used in place of
/// images that fail to load.
#[must_use]
pub fn checkerboard() -> ImageData {
    let size = CHECKERBOARD_SIZE;
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let on = ((x / CHECKERBOARD_CELL) + (y / CHECKERBOARD_CELL)) % 2 == 0;
            let v = if on { 0xFF } else { 0x00 };
            pixels.extend_from_slice(&[v, v, v, 0xFF]);
        }
    }
    ImageData {
        width: size,
        height: size,
        components: 4,
        pixels,
    }
}
