//! Scene hierarchy and transform evaluation.
//!
//! - Node: one hierarchy node with its static TRS and attachments
//! - NodeGraph: the flat node array of a model plus its meshes, skins and clips
//! - Skin: joint list and inverse bind matrices
//! - transform_system: local/global propagation and skinning

pub mod graph;
pub mod node;
pub mod skeleton;
pub mod transform;
pub mod transform_system;

pub use graph::NodeGraph;
pub use node::Node;
pub use skeleton::{Skin, SkinTransforms};
pub use transform::{NodePose, compute_local_matrix};
pub use transform_system::{ModelTransforms, propagate_global};
