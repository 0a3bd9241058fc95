//! GPU side of a model.
//!
//! Resources are created by a [`RenderDevice`] during loading, carrying
//! their upload data as a pending payload. The first
//! [`Model::prepare_gpu_resources`](crate::model::Model::prepare_gpu_resources)
//! call records the uploads through a [`DeviceContext`].

pub mod device;
pub mod gpu_buffer;
pub mod gpu_texture;
pub mod mipmap;
pub mod pending;
pub(crate) mod staging;
pub mod wgpu_backend;

pub use device::{
    BufferDesc, DeviceContext, RenderDevice, ResourceState, StateTransition, SubresourceData,
    TextureCopy, TextureDesc, TextureRegion, TransitionTarget,
};
pub use gpu_buffer::{BufferKind, GpuBuffer};
pub use gpu_texture::{GpuTexture, StagingTexture, TextureUpload};
pub use pending::PendingUpload;
pub use wgpu_backend::{WgpuContext, WgpuDevice};
