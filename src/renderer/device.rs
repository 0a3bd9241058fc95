//! GPU device abstraction.
//!
//! [`RenderDevice`] creates resources and may be shared across loader
//! threads. [`DeviceContext`] records uploads, copies and state transitions
//! and is used from one thread at a time. [`wgpu_backend`](super::wgpu_backend)
//! implements both on `wgpu`; tests use recording mocks.

use crate::errors::Result;
use crate::resources::texture::TextureSampler;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureDesc {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub array_layers: u32,
    pub mip_level_count: u32,
    pub format: wgpu::TextureFormat,
    pub usage: wgpu::TextureUsages,
}

impl TextureDesc {
    /// Mip extent of `level`, never below one texel.
    #[inline]
    #[must_use]
    pub fn mip_extent(&self, level: u32) -> (u32, u32) {
        crate::resources::texture::mip_extent(self.width, self.height, level)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferDesc {
    pub label: String,
    pub size: u64,
    pub usage: wgpu::BufferUsages,
}

/// Pixel data for one subresource, rows `stride` bytes apart.
#[derive(Debug, Clone, Copy)]
pub struct SubresourceData<'a> {
    pub data: &'a [u8],
    pub stride: u32,
}

/// Destination rectangle of a texture update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A whole-mip copy from a source texture into a region of a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureCopy {
    pub src_mip: u32,
    pub dst_mip: u32,
    pub dst_slice: u32,
    pub dst_x: u32,
    pub dst_y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceState {
    ShaderResource,
    VertexBuffer,
    IndexBuffer,
}

pub enum TransitionTarget<'a, D: RenderDevice + ?Sized> {
    Texture(&'a D::Texture),
    Buffer(&'a D::Buffer),
}

/// Requested state change for one resource, submitted in batches through
/// [`DeviceContext::transition_resource_states`].
pub struct StateTransition<'a, D: RenderDevice + ?Sized> {
    pub resource: TransitionTarget<'a, D>,
    pub new_state: ResourceState,
}

impl<'a, D: RenderDevice + ?Sized> StateTransition<'a, D> {
    #[must_use]
    pub fn texture(texture: &'a D::Texture, new_state: ResourceState) -> Self {
        Self {
            resource: TransitionTarget::Texture(texture),
            new_state,
        }
    }

    #[must_use]
    pub fn buffer(buffer: &'a D::Buffer, new_state: ResourceState) -> Self {
        Self {
            resource: TransitionTarget::Buffer(buffer),
            new_state,
        }
    }
}

/// Resource creation. Implementations must be usable from many loader
/// threads at once.
pub trait RenderDevice: Send + Sync {
    type Texture: Send + Sync + 'static;
    type Buffer: Send + Sync + 'static;
    type Sampler: Send + Sync + 'static;

    /// Creates a texture, optionally filled with one entry per mip level
    /// (slice 0).
    fn create_texture(
        &self,
        desc: &TextureDesc,
        initial_data: Option<&[SubresourceData<'_>]>,
    ) -> Result<Self::Texture>;

    fn create_buffer(&self, desc: &BufferDesc) -> Result<Self::Buffer>;

    fn create_sampler(&self, desc: &TextureSampler) -> Result<Self::Sampler>;
}

/// Command recording for one device.
pub trait DeviceContext<D: RenderDevice> {
    fn update_texture(
        &mut self,
        texture: &D::Texture,
        mip_level: u32,
        slice: u32,
        region: TextureRegion,
        data: SubresourceData<'_>,
    );

    fn update_buffer(&mut self, buffer: &D::Buffer, offset: u64, data: &[u8]);

    fn copy_texture(&mut self, src: &D::Texture, dst: &D::Texture, copy: TextureCopy);

    /// Fills mips 1.. of `texture` from mip 0.
    fn generate_mips(&mut self, texture: &D::Texture);

    fn transition_resource_states(&mut self, transitions: &[StateTransition<'_, D>]);
}
