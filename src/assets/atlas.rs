//! Texture atlas sub-allocation.
//!
//! With an [`AtlasAllocator`] configured, decoded textures are placed into
//! regions of shared array textures instead of getting a texture each.
//! Materials then address their region through a UV scale/bias and an array
//! slice.

use glam::{UVec2, Vec4};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::assets::cache::ResourceCache;
use crate::errors::{Error, Result};
use crate::renderer::device::{RenderDevice, TextureDesc};
use crate::renderer::gpu_texture::TextureUpload;
use crate::renderer::pending::PendingUpload;

/// One shared array texture.
pub struct TextureAtlas<D: RenderDevice> {
    texture: D::Texture,
    desc: TextureDesc,
}

impl<D: RenderDevice> TextureAtlas<D> {
    #[inline]
    pub fn texture(&self) -> &D::Texture {
        &self.texture
    }

    #[inline]
    pub fn desc(&self) -> &TextureDesc {
        &self.desc
    }
}

/// A region of an atlas reserved for one source image.
pub struct AtlasSuballocation<D: RenderDevice> {
    atlas: Arc<TextureAtlas<D>>,
    key: String,
    origin: UVec2,
    size: UVec2,
    slice: u32,
    pending: PendingUpload<TextureUpload<D>>,
}

impl<D: RenderDevice> AtlasSuballocation<D> {
    /// Allocations are normally produced by an [`AtlasAllocator`]; this is
    /// the constructor custom allocators use.
    #[must_use]
    pub fn new(
        atlas: Arc<TextureAtlas<D>>,
        key: &str,
        origin: UVec2,
        size: UVec2,
        slice: u32,
        upload: TextureUpload<D>,
    ) -> Self {
        Self {
            atlas,
            key: key.to_string(),
            origin,
            size,
            slice,
            pending: PendingUpload::new(upload),
        }
    }

    #[inline]
    pub fn atlas(&self) -> &Arc<TextureAtlas<D>> {
        &self.atlas
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn origin(&self) -> UVec2 {
        self.origin
    }

    #[inline]
    pub fn size(&self) -> UVec2 {
        self.size
    }

    #[inline]
    pub fn slice(&self) -> u32 {
        self.slice
    }

    #[inline]
    pub fn pending(&self) -> &PendingUpload<TextureUpload<D>> {
        &self.pending
    }

    /// `(size / atlas_size, origin / atlas_size)`: maps the region's own
    /// `[0, 1]` UVs into atlas UVs.
    #[must_use]
    pub fn uv_scale_bias(&self) -> Vec4 {
        let desc = self.atlas.desc();
        let atlas_size = UVec2::new(desc.width, desc.height).as_vec2();
        let scale = self.size.as_vec2() / atlas_size;
        let bias = self.origin.as_vec2() / atlas_size;
        Vec4::new(scale.x, scale.y, bias.x, bias.y)
    }
}

impl<D: RenderDevice> std::fmt::Debug for TextureAtlas<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureAtlas")
            .field("desc", &self.desc)
            .finish_non_exhaustive()
    }
}

impl<D: RenderDevice> std::fmt::Debug for AtlasSuballocation<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtlasSuballocation")
            .field("key", &self.key)
            .field("origin", &self.origin)
            .field("size", &self.size)
            .field("slice", &self.slice)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

/// Places textures into shared atlases.
///
/// Implementations are shared by all loader threads. Two threads that miss
/// the same key at the same time may both allocate; either result is valid.
pub trait AtlasAllocator<D: RenderDevice>: Send + Sync {
    /// Description of the atlas used for `format`. Level data passed to
    /// [`allocate_texture_space`](Self::allocate_texture_space) must have
    /// `mip_level_count` levels.
    fn atlas_desc(&self, format: wgpu::TextureFormat) -> TextureDesc;

    fn find_allocation(&self, key: &str) -> Option<Arc<AtlasSuballocation<D>>>;

    fn allocate_texture_space(
        &self,
        device: &D,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        key: &str,
        upload: TextureUpload<D>,
    ) -> Result<Arc<AtlasSuballocation<D>>>;
}

// ============================================================================
// Shelf packing
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct Shelf {
    y: u32,
    height: u32,
    cursor_x: u32,
}

/// Packs rectangles into one layer in horizontal shelves.
#[derive(Debug, Clone)]
struct ShelfPacker {
    size: u32,
    shelves: Vec<Shelf>,
    next_y: u32,
}

impl ShelfPacker {
    fn new(size: u32) -> Self {
        Self {
            size,
            shelves: Vec::new(),
            next_y: 0,
        }
    }

    fn pack(&mut self, width: u32, height: u32) -> Option<UVec2> {
        if width > self.size || height > self.size {
            return None;
        }

        // Best fit among existing shelves tall enough for the rectangle.
        let best = self
            .shelves
            .iter_mut()
            .filter(|s| s.height >= height && self.size - s.cursor_x >= width)
            .min_by_key(|s| s.height - height);
        if let Some(shelf) = best {
            let origin = UVec2::new(shelf.cursor_x, shelf.y);
            shelf.cursor_x += width;
            return Some(origin);
        }

        if self.size - self.next_y < height {
            return None;
        }
        let origin = UVec2::new(0, self.next_y);
        self.shelves.push(Shelf {
            y: self.next_y,
            height,
            cursor_x: width,
        });
        self.next_y += height;
        Some(origin)
    }
}

struct AtlasPage<D: RenderDevice> {
    atlas: Arc<TextureAtlas<D>>,
    layers: Vec<ShelfPacker>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasConfig {
    /// Width and height of every layer.
    pub size: u32,
    pub layers: u32,
    pub mip_levels: u32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            size: 2048,
            layers: 4,
            mip_levels: 6,
        }
    }
}

/// Reference [`AtlasAllocator`]: one array texture per format, regions
/// packed into shelves layer by layer.
///
/// Regions are aligned to `2^(mip_levels - 1)` texels so every mip of a
/// region starts on a whole texel. Space is not reclaimed until the
/// allocator itself is dropped.
pub struct ShelfAtlasAllocator<D: RenderDevice> {
    config: AtlasConfig,
    pages: Mutex<FxHashMap<wgpu::TextureFormat, AtlasPage<D>>>,
    allocations: ResourceCache<AtlasSuballocation<D>>,
}

impl<D: RenderDevice> ShelfAtlasAllocator<D> {
    #[must_use]
    pub fn new(config: AtlasConfig) -> Self {
        Self {
            config,
            pages: Mutex::new(FxHashMap::default()),
            allocations: ResourceCache::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    fn alignment(&self) -> u32 {
        1 << self.config.mip_levels.saturating_sub(1)
    }
}

fn lcm(a: u32, b: u32) -> u32 {
    let (mut x, mut y) = (a, b);
    while y != 0 {
        (x, y) = (y, x % y);
    }
    a / x * b
}

impl<D: RenderDevice> AtlasAllocator<D> for ShelfAtlasAllocator<D> {
    fn atlas_desc(&self, format: wgpu::TextureFormat) -> TextureDesc {
        TextureDesc {
            label: format!("Texture Atlas {format:?}"),
            width: self.config.size,
            height: self.config.size,
            array_layers: self.config.layers,
            mip_level_count: self.config.mip_levels,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        }
    }

    fn find_allocation(&self, key: &str) -> Option<Arc<AtlasSuballocation<D>>> {
        self.allocations.get(key)
    }

    fn allocate_texture_space(
        &self,
        device: &D,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        key: &str,
        upload: TextureUpload<D>,
    ) -> Result<Arc<AtlasSuballocation<D>>> {
        let align = self.alignment();
        let (block_w, block_h) = format.block_dimensions();
        let padded = UVec2::new(
            width.next_multiple_of(lcm(align, block_w)),
            height.next_multiple_of(lcm(align, block_h)),
        );

        let (atlas, origin, slice) = {
            let mut pages = self.pages.lock();
            let page = match pages.entry(format) {
                std::collections::hash_map::Entry::Occupied(e) => e.into_mut(),
                std::collections::hash_map::Entry::Vacant(e) => {
                    let desc = self.atlas_desc(format);
                    let texture = device.create_texture(&desc, None)?;
                    log::debug!("Created {}x{} atlas for {format:?}", desc.width, desc.height);
                    e.insert(AtlasPage {
                        atlas: Arc::new(TextureAtlas { texture, desc }),
                        layers: (0..self.config.layers)
                            .map(|_| ShelfPacker::new(self.config.size))
                            .collect(),
                    })
                }
            };

            let placed = page
                .layers
                .iter_mut()
                .enumerate()
                .find_map(|(slice, packer)| packer.pack(padded.x, padded.y).map(|o| (o, slice)));

            let Some((origin, slice)) = placed else {
                return Err(Error::Atlas(format!(
                    "no space for {width}x{height} region '{key}' in {format:?} atlas"
                )));
            };
            (Arc::clone(&page.atlas), origin, slice as u32)
        };

        let allocation = Arc::new(AtlasSuballocation::new(
            atlas,
            key,
            origin,
            UVec2::new(width, height),
            slice,
            upload,
        ));

        if key.is_empty() {
            return Ok(allocation);
        }
        Ok(self.allocations.publish(key, allocation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shelf_packer_fills_rows_then_opens_new_shelf() {
        let mut p = ShelfPacker::new(64);
        assert_eq!(p.pack(32, 16), Some(UVec2::new(0, 0)));
        assert_eq!(p.pack(32, 16), Some(UVec2::new(32, 0)));
        assert_eq!(p.pack(32, 16), Some(UVec2::new(0, 16)));
        assert_eq!(p.pack(64, 48), None);
        assert_eq!(p.pack(128, 1), None);
    }

    #[test]
    fn region_alignment_combines_mips_and_blocks() {
        assert_eq!(lcm(4, 4), 4);
        assert_eq!(lcm(1, 4), 4);
        assert_eq!(lcm(4, 6), 12);
    }

    #[test]
    fn shelf_packer_reuses_taller_shelf() {
        let mut p = ShelfPacker::new(64);
        p.pack(16, 32);
        assert_eq!(p.pack(16, 8), Some(UVec2::new(16, 0)));
    }
}
