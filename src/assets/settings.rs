//! Model Loading Configuration
//!
//! [`ModelCreateInfo`] describes where a model comes from and which shared
//! resources it may reuse.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use scene_runtime::assets::{ModelCreateInfo, ModelLoader, TextureCache};
//!
//! let cache = TextureCache::shared();
//! let info = ModelCreateInfo {
//!     file_name: "assets/fox/fox.gltf".into(),
//!     texture_cache: Some(Arc::clone(&cache)),
//!     ..Default::default()
//! };
//!
//! let model = ModelLoader::new(&device, &info).load(&document)?;
//! ```
//!
//! # Sharing
//!
//! Models loaded with the same [`TextureCache`] share textures whose
//! canonical paths match. With an atlas allocator configured, textures are
//! placed into atlas regions instead and the cache is not consulted; setting
//! both logs a warning.
//!
//! With a buffer allocator configured, vertex and index data are placed in
//! the allocator's shared buffers. Models sharing an allocator can be drawn
//! from the same bound buffers.

use std::sync::Arc;

use crate::assets::atlas::AtlasAllocator;
use crate::assets::buffer_pool::BufferAllocator;
use crate::assets::cache::TextureCache;
use crate::assets::decoder::{ImageCrateDecoder, ImageDecoder};
use crate::assets::io::{AssetReader, FileAssetReader};
use crate::resources::material::Material;
use crate::renderer::device::RenderDevice;

/// Invoked for every material after it is read from the document, with the
/// material's document index.
pub type MaterialLoadCallback = Arc<dyn Fn(usize, &mut Material) + Send + Sync>;

pub struct ModelCreateInfo<D: RenderDevice> {
    /// Document path. Image URIs resolve relative to its directory.
    pub file_name: String,

    /// Scene to instantiate. `None` (or an invalid index) selects the
    /// document's default scene.
    pub scene_id: Option<usize>,

    /// `Uint16` or `Uint32`. With `Uint16` a model whose vertex count does
    /// not fit fails to load.
    pub index_format: wgpu::IndexFormat,

    pub texture_cache: Option<Arc<TextureCache<D>>>,

    pub atlas_allocator: Option<Arc<dyn AtlasAllocator<D>>>,

    pub buffer_allocator: Option<Arc<dyn BufferAllocator<D>>>,

    pub material_load_callback: Option<MaterialLoadCallback>,

    /// Defaults to a [`FileAssetReader`] rooted at the working directory.
    pub asset_reader: Option<Arc<dyn AssetReader>>,

    /// Defaults to [`ImageCrateDecoder`].
    pub image_decoder: Option<Arc<dyn ImageDecoder>>,
}

impl<D: RenderDevice> Default for ModelCreateInfo<D> {
    fn default() -> Self {
        Self {
            file_name: String::new(),
            scene_id: None,
            index_format: wgpu::IndexFormat::Uint32,
            texture_cache: None,
            atlas_allocator: None,
            buffer_allocator: None,
            material_load_callback: None,
            asset_reader: None,
            image_decoder: None,
        }
    }
}

impl<D: RenderDevice> ModelCreateInfo<D> {
    pub(crate) fn reader(&self) -> Arc<dyn AssetReader> {
        self.asset_reader
            .clone()
            .unwrap_or_else(|| Arc::new(FileAssetReader::default()))
    }

    pub(crate) fn decoder(&self) -> Arc<dyn ImageDecoder> {
        self.image_decoder
            .clone()
            .unwrap_or_else(|| Arc::new(ImageCrateDecoder))
    }

    /// The texture cache to use, or `None` when an atlas takes precedence.
    pub(crate) fn effective_texture_cache(&self) -> Option<&Arc<TextureCache<D>>> {
        match (&self.texture_cache, &self.atlas_allocator) {
            (Some(_), Some(_)) => {
                log::warn!(
                    "Texture cache is ignored when an atlas allocator is configured"
                );
                None
            }
            (cache, None) => cache.as_ref(),
            (None, Some(_)) => None,
        }
    }
}
