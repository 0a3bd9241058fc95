//! Read-only view of a parsed scene document.
//!
//! The loader never talks to a file-format parser directly. It pulls plain
//! records through [`SceneDocument`], so any parser (the `gltf` adapter, a
//! test fixture, a custom format) can feed it. [`DocumentData`] is the
//! in-memory implementation.

use glam::{Mat4, Quat, Vec3, Vec4};

use crate::animation::{InterpolationMode, TargetPath};
use crate::resources::geometry::BoundingBox;
use crate::resources::material::{AlphaMode, TextureSlot};
use crate::resources::texture::TextureSampler;

#[derive(Debug, Clone, Default)]
pub struct SceneRecord {
    pub name: Option<String>,
    /// Root node indices.
    pub nodes: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct NodeRecord {
    pub name: Option<String>,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub matrix: Option<Mat4>,
    pub mesh: Option<usize>,
    pub skin: Option<usize>,
    pub children: Vec<usize>,
}

impl Default for NodeRecord {
    fn default() -> Self {
        Self {
            name: None,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            matrix: None,
            mesh: None,
            skin: None,
            children: Vec::new(),
        }
    }
}

/// Mesh geometry already flattened to one vertex stream and a u32 index
/// list. `indices` are relative to this mesh's first vertex.
#[derive(Debug, Clone, Default)]
pub struct MeshRecord {
    pub name: Option<String>,
    pub bounds: Option<BoundingBox>,
    pub vertex_data: Vec<u8>,
    pub vertex_stride: u32,
    pub indices: Vec<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct SkinRecord {
    pub name: Option<String>,
    pub joints: Vec<usize>,
    /// `None` means identity for every joint.
    pub inverse_bind_matrices: Option<Vec<Mat4>>,
    pub skeleton: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureBinding {
    pub slot: TextureSlot,
    pub texture: usize,
    pub tex_coord: u32,
}

#[derive(Debug, Clone)]
pub struct MaterialRecord {
    pub name: Option<String>,
    pub alpha_mode: AlphaMode,
    /// Only meaningful for [`AlphaMode::Mask`]. Defaults to 0.5 when absent.
    pub alpha_cutoff: Option<f32>,
    pub base_color_factor: Vec4,
    pub emissive_factor: Vec3,
    pub metallic_factor: f32,
    pub roughness_factor: f32,
    pub double_sided: bool,
    pub textures: Vec<TextureBinding>,
}

impl Default for MaterialRecord {
    fn default() -> Self {
        Self {
            name: None,
            alpha_mode: AlphaMode::Opaque,
            alpha_cutoff: None,
            base_color_factor: Vec4::ONE,
            emissive_factor: Vec3::ZERO,
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            double_sided: false,
            textures: Vec::new(),
        }
    }
}

pub type SamplerRecord = TextureSampler;

#[derive(Debug, Clone, Default)]
pub struct TextureRecord {
    pub name: Option<String>,
    pub image: usize,
    pub sampler: Option<usize>,
}

#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Path relative to the document's directory.
    Uri(String),
    /// Bytes stored inside the document (data URI or binary chunk).
    Embedded(Vec<u8>),
}

#[derive(Debug, Clone)]
pub struct ImageRecord {
    pub name: Option<String>,
    pub source: ImageSource,
}

#[derive(Debug, Clone)]
pub struct AnimationSamplerRecord {
    pub inputs: Vec<f32>,
    pub outputs: Vec<Vec4>,
    pub interpolation: InterpolationMode,
}

#[derive(Debug, Clone, Copy)]
pub struct AnimationChannelRecord {
    pub sampler: usize,
    pub target_node: Option<usize>,
    pub path: TargetPath,
}

#[derive(Debug, Clone, Default)]
pub struct AnimationRecord {
    pub name: Option<String>,
    pub samplers: Vec<AnimationSamplerRecord>,
    pub channels: Vec<AnimationChannelRecord>,
}

/// Narrow read-only interface over a parsed scene document.
///
/// Accessors return `None` for out-of-range indices; the loader turns those
/// into [`Error::IndexOutOfBounds`](crate::errors::Error::IndexOutOfBounds).
pub trait SceneDocument {
    fn scenes(&self) -> Vec<SceneRecord>;
    fn default_scene(&self) -> Option<usize>;

    fn node_count(&self) -> usize;
    fn node(&self, index: usize) -> Option<NodeRecord>;

    fn mesh_count(&self) -> usize;
    fn mesh(&self, index: usize) -> Option<MeshRecord>;

    fn skin_count(&self) -> usize;
    fn skin(&self, index: usize) -> Option<SkinRecord>;

    fn material_count(&self) -> usize;
    fn material(&self, index: usize) -> Option<MaterialRecord>;

    fn sampler_count(&self) -> usize;
    fn sampler(&self, index: usize) -> Option<SamplerRecord>;

    fn texture_count(&self) -> usize;
    fn texture(&self, index: usize) -> Option<TextureRecord>;

    fn image_count(&self) -> usize;
    fn image(&self, index: usize) -> Option<ImageRecord>;

    fn animation_count(&self) -> usize;
    fn animation(&self, index: usize) -> Option<AnimationRecord>;
}

/// A fully materialized document held in memory.
#[derive(Debug, Clone, Default)]
pub struct DocumentData {
    pub scenes: Vec<SceneRecord>,
    pub default_scene: Option<usize>,
    pub nodes: Vec<NodeRecord>,
    pub meshes: Vec<MeshRecord>,
    pub skins: Vec<SkinRecord>,
    pub materials: Vec<MaterialRecord>,
    pub samplers: Vec<SamplerRecord>,
    pub textures: Vec<TextureRecord>,
    pub images: Vec<ImageRecord>,
    pub animations: Vec<AnimationRecord>,
}

impl SceneDocument for DocumentData {
    fn scenes(&self) -> Vec<SceneRecord> {
        self.scenes.clone()
    }

    fn default_scene(&self) -> Option<usize> {
        self.default_scene
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, index: usize) -> Option<NodeRecord> {
        self.nodes.get(index).cloned()
    }

    fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    fn mesh(&self, index: usize) -> Option<MeshRecord> {
        self.meshes.get(index).cloned()
    }

    fn skin_count(&self) -> usize {
        self.skins.len()
    }

    fn skin(&self, index: usize) -> Option<SkinRecord> {
        self.skins.get(index).cloned()
    }

    fn material_count(&self) -> usize {
        self.materials.len()
    }

    fn material(&self, index: usize) -> Option<MaterialRecord> {
        self.materials.get(index).cloned()
    }

    fn sampler_count(&self) -> usize {
        self.samplers.len()
    }

    fn sampler(&self, index: usize) -> Option<SamplerRecord> {
        self.samplers.get(index).cloned()
    }

    fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn texture(&self, index: usize) -> Option<TextureRecord> {
        self.textures.get(index).cloned()
    }

    fn image_count(&self) -> usize {
        self.images.len()
    }

    fn image(&self, index: usize) -> Option<ImageRecord> {
        self.images.get(index).cloned()
    }

    fn animation_count(&self) -> usize {
        self.animations.len()
    }

    fn animation(&self, index: usize) -> Option<AnimationRecord> {
        self.animations.get(index).cloned()
    }
}
