//! GPU-independent resource definitions:
//! - geometry: bounding boxes and mesh ranges
//! - material: material parameters and the alpha cutoff policy
//! - image: decoded pixels, alpha remap and CPU mip chains
//! - texture: sampler state and mip helpers

pub mod geometry;
pub mod image;
pub mod material;
pub mod texture;

pub use geometry::{BoundingBox, Mesh};
pub use image::{ImageData, MipLevel};
pub use material::{AlphaMode, Material, TextureSlot};
pub use texture::TextureSampler;
