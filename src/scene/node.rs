use glam::{Mat4, Quat, Vec3};

use crate::scene::transform::NodePose;

/// A node of the scene hierarchy.
///
/// Nodes live in a flat array owned by [`NodeGraph`](crate::scene::NodeGraph)
/// and refer to each other by index. `index` always equals the node's
/// position in that array.
#[derive(Debug, Clone)]
pub struct Node {
    pub index: usize,
    pub name: Option<String>,

    // === Static transform ===
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// Applied after TRS. Identity when the source node has none.
    pub matrix: Mat4,

    // === Attachments ===
    pub mesh: Option<usize>,
    pub skin: Option<usize>,
    /// Slot in [`ModelTransforms::skins`](crate::scene::ModelTransforms)
    /// for nodes that own both a mesh and a skin.
    pub skin_instance: Option<usize>,

    // === Hierarchy ===
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

impl Node {
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self {
            index,
            name: None,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            matrix: Mat4::IDENTITY,
            mesh: None,
            skin: None,
            skin_instance: None,
            parent: None,
            children: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn static_pose(&self) -> NodePose {
        NodePose {
            translation: self.translation,
            rotation: self.rotation,
            scale: self.scale,
        }
    }

    /// Rest-pose local matrix.
    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> Mat4 {
        self.static_pose().to_local_matrix(&self.matrix)
    }

    #[inline]
    #[must_use]
    pub fn is_skinned_mesh(&self) -> bool {
        self.mesh.is_some() && self.skin.is_some()
    }
}
