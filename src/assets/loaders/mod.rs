//! Model loaders.
//!
//! [`ModelLoader`] turns any [`SceneDocument`](crate::assets::SceneDocument)
//! into a [`Model`](crate::model::Model). With the `gltf` feature enabled,
//! glTF 2.0 files can be read directly.

#[cfg(feature = "gltf")]
pub mod gltf;
mod model;

pub use self::model::ModelLoader;

#[cfg(feature = "gltf")]
pub use self::gltf::{SkinnedVertex, convert_document, read_gltf};
