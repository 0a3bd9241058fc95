//! Asset loading.
//!
//! - document: the record-level view of a scene file the loader consumes
//! - loaders: [`ModelLoader`] and the optional glTF adapter
//! - cache: weak-reference sharing of textures across models
//! - atlas: sub-allocation of textures inside shared atlases
//! - buffer_pool: sub-allocation of vertex and index data inside shared buffers
//! - io / decoder: pluggable file access and image decoding

pub mod atlas;
pub mod buffer_pool;
pub mod cache;
pub mod decoder;
pub mod document;
pub mod io;
pub mod loaders;
pub mod settings;

pub use atlas::{AtlasAllocator, AtlasConfig, AtlasSuballocation, ShelfAtlasAllocator, TextureAtlas};
pub use buffer_pool::{
    BufferAllocator, BufferPage, BufferPoolConfig, BufferSuballocation, LinearBufferAllocator,
};
pub use cache::{CacheLookup, ResourceCache, TextureCache};
pub use decoder::{DecodedImage, ImageCrateDecoder, ImageDecoder, PrebuiltTexture};
pub use document::{DocumentData, SceneDocument};
pub use io::{AssetReader, FileAssetReader, base_dir, simplify_path};
pub use loaders::ModelLoader;
pub use settings::{MaterialLoadCallback, ModelCreateInfo};
