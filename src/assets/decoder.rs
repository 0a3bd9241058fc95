use crate::errors::Result;
use crate::resources::image::{ImageData, MipLevel};

/// Block-compressed (or otherwise GPU-ready) texture data that is uploaded
/// as-is, such as the contents of a DDS or KTX container.
#[derive(Debug, Clone)]
pub struct PrebuiltTexture {
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
    pub levels: Vec<MipLevel>,
}

#[derive(Debug, Clone)]
pub enum DecodedImage {
    Pixels(ImageData),
    Prebuilt(PrebuiltTexture),
}

impl DecodedImage {
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            DecodedImage::Pixels(img) => (img.width, img.height),
            DecodedImage::Prebuilt(tex) => (tex.width, tex.height),
        }
    }
}

/// Turns encoded image bytes into pixels.
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage>;
}

/// Decoder backed by the `image` crate (PNG and JPEG).
///
/// Images with an alpha channel decode to RGBA8, all others to RGB8.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateDecoder;

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage> {
        let img = image::load_from_memory(bytes)?;
        let (width, height) = (img.width(), img.height());

        let data = if img.color().has_alpha() {
            ImageData {
                width,
                height,
                components: 4,
                pixels: img.into_rgba8().into_raw(),
            }
        } else {
            ImageData {
                width,
                height,
                components: 3,
                pixels: img.into_rgb8().into_raw(),
            }
        };

        Ok(DecodedImage::Pixels(data))
    }
}
