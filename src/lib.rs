//! Scene transform evaluation, skeletal animation and deduplicated GPU
//! resource loading for glTF-style models.
//!
//! A [`Model`] is loaded once through [`ModelLoader`] and shared by any
//! number of instances. Each instance owns a [`ModelTransforms`] buffer that
//! [`Model::compute_transforms`] fills for a chosen clip and time. Textures
//! are shared between models through a [`TextureCache`] or packed into
//! atlases through an [`AtlasAllocator`].

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod animation;
pub mod assets;
pub mod errors;
pub mod model;
pub mod renderer;
pub mod resources;
pub mod scene;

pub use animation::{Animation, AnimationSampler, InterpolationMode, TargetPath};
pub use assets::{
    AtlasAllocator, BufferAllocator, DocumentData, LinearBufferAllocator, ModelCreateInfo,
    ModelLoader, SceneDocument, ShelfAtlasAllocator, TextureCache,
};
pub use errors::{Error, Result};
pub use model::{Model, ModelBuffer, TextureInfo};
pub use renderer::{DeviceContext, RenderDevice, WgpuContext, WgpuDevice};
pub use resources::{BoundingBox, Material, Mesh};
pub use scene::{ModelTransforms, Node, NodeGraph, NodePose, Skin};
