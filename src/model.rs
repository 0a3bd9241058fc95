//! A loaded model: node hierarchy, clips, materials and the GPU resources it
//! references.

use glam::Mat4;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::animation::Animation;
use crate::assets::atlas::AtlasSuballocation;
use crate::assets::buffer_pool::BufferSuballocation;
use crate::errors::Result;
use crate::renderer::device::{DeviceContext, RenderDevice};
use crate::renderer::gpu_buffer::{BufferKind, GpuBuffer};
use crate::renderer::pending::PendingUpload;
use crate::renderer::gpu_texture::GpuTexture;
use crate::renderer::staging;
use crate::resources::geometry::BoundingBox;
use crate::resources::material::Material;
use crate::scene::{ModelTransforms, Node, NodeGraph};

/// A model texture: either a standalone texture or an atlas region.
/// Both are `None` only when the texture failed to load in atlas mode.
pub struct TextureInfo<D: RenderDevice> {
    pub texture: Option<Arc<GpuTexture<D>>>,
    pub atlas_allocation: Option<Arc<AtlasSuballocation<D>>>,
}

impl<D: RenderDevice> TextureInfo<D> {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.texture.is_some() || self.atlas_allocation.is_some()
    }
}

impl<D: RenderDevice> Default for TextureInfo<D> {
    fn default() -> Self {
        Self {
            texture: None,
            atlas_allocation: None,
        }
    }
}

/// A model vertex or index buffer: either a buffer of its own or a range of
/// a shared pool buffer.
pub enum ModelBuffer<D: RenderDevice> {
    Standalone(GpuBuffer<D>),
    Pooled(Arc<BufferSuballocation<D>>),
}

impl<D: RenderDevice> ModelBuffer<D> {
    #[inline]
    pub fn raw(&self) -> &D::Buffer {
        match self {
            ModelBuffer::Standalone(buffer) => buffer.raw(),
            ModelBuffer::Pooled(allocation) => allocation.page().buffer(),
        }
    }

    /// Byte offset of the model's data inside [`raw`](Self::raw).
    #[inline]
    pub fn offset(&self) -> u64 {
        match self {
            ModelBuffer::Standalone(_) => 0,
            ModelBuffer::Pooled(allocation) => allocation.offset(),
        }
    }

    #[inline]
    pub fn size(&self) -> u64 {
        match self {
            ModelBuffer::Standalone(buffer) => buffer.desc().size,
            ModelBuffer::Pooled(allocation) => allocation.size(),
        }
    }

    #[inline]
    pub fn kind(&self) -> BufferKind {
        match self {
            ModelBuffer::Standalone(buffer) => buffer.kind(),
            ModelBuffer::Pooled(allocation) => allocation.kind(),
        }
    }

    #[inline]
    pub fn pending(&self) -> &PendingUpload<Vec<u8>> {
        match self {
            ModelBuffer::Standalone(buffer) => buffer.pending(),
            ModelBuffer::Pooled(allocation) => allocation.pending(),
        }
    }

    #[inline]
    pub fn is_pooled(&self) -> bool {
        matches!(self, ModelBuffer::Pooled(_))
    }
}

impl<D: RenderDevice> std::fmt::Debug for ModelBuffer<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelBuffer::Standalone(buffer) => f.debug_tuple("Standalone").field(buffer).finish(),
            ModelBuffer::Pooled(allocation) => f.debug_tuple("Pooled").field(allocation).finish(),
        }
    }
}

pub struct Model<D: RenderDevice> {
    pub(crate) graph: NodeGraph,
    pub(crate) materials: Vec<Material>,
    pub(crate) samplers: Vec<Arc<D::Sampler>>,
    pub(crate) textures: Vec<TextureInfo<D>>,
    pub(crate) vertex_buffer: Option<ModelBuffer<D>>,
    pub(crate) index_buffer: Option<ModelBuffer<D>>,
    pub(crate) index_format: wgpu::IndexFormat,
    pub(crate) gpu_data_initialized: AtomicBool,
}

impl<D: RenderDevice> Model<D> {
    // ========================================================================
    // Transforms
    // ========================================================================

    /// Evaluates node and joint matrices for one instance of this model.
    /// See [`NodeGraph::compute_transforms`].
    pub fn compute_transforms(
        &self,
        transforms: &mut ModelTransforms,
        root_transform: &Mat4,
        animation: Option<usize>,
        time: f32,
    ) {
        self.graph
            .compute_transforms(transforms, root_transform, animation, time);
    }

    pub fn compute_bounding_box(&self, transforms: &ModelTransforms) -> Result<BoundingBox> {
        self.graph.compute_bounding_box(transforms)
    }

    // ========================================================================
    // GPU materialization
    // ========================================================================

    /// Uploads every pending texture, atlas region and buffer of this model.
    ///
    /// Only the first call on a model does any work. Resources shared with
    /// models that already materialized them are skipped. Returns whether
    /// this call performed the materialization.
    pub fn prepare_gpu_resources<C: DeviceContext<D>>(&self, ctx: &mut C) -> bool {
        if self
            .gpu_data_initialized
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        staging::upload_model_resources(self, ctx);
        true
    }

    #[must_use]
    pub fn is_gpu_data_initialized(&self) -> bool {
        self.gpu_data_initialized.load(Ordering::Acquire)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn graph(&self) -> &NodeGraph {
        &self.graph
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        self.graph.nodes()
    }

    #[inline]
    pub fn animations(&self) -> &[Animation] {
        self.graph.animations()
    }

    #[inline]
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    #[inline]
    pub fn samplers(&self) -> &[Arc<D::Sampler>] {
        &self.samplers
    }

    #[inline]
    pub fn textures(&self) -> &[TextureInfo<D>] {
        &self.textures
    }

    #[inline]
    pub fn texture(&self, index: usize) -> Option<&TextureInfo<D>> {
        self.textures.get(index)
    }

    #[inline]
    pub fn vertex_buffer(&self) -> Option<&ModelBuffer<D>> {
        self.vertex_buffer.as_ref()
    }

    #[inline]
    pub fn index_buffer(&self) -> Option<&ModelBuffer<D>> {
        self.index_buffer.as_ref()
    }

    #[inline]
    pub fn index_format(&self) -> wgpu::IndexFormat {
        self.index_format
    }
}
