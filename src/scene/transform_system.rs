//! Transform System
//!
//! Turns a [`NodeGraph`] plus an optional animation into per-node local and
//! global matrices and per-instance skinning matrices. All output lives in a
//! caller-owned [`ModelTransforms`], so one model can be evaluated for many
//! instances without copying it, and buffers are reused across frames.

use glam::Mat4;

use crate::errors::{Error, Result};
use crate::resources::geometry::BoundingBox;
use crate::scene::graph::NodeGraph;
use crate::scene::skeleton::SkinTransforms;
use crate::scene::transform::NodePose;

/// Scratch and output buffers for one evaluation of a model.
#[derive(Debug, Clone, Default)]
pub struct ModelTransforms {
    pub node_local_matrices: Vec<Mat4>,
    pub node_global_matrices: Vec<Mat4>,
    /// Working poses. Only filled when an animation is evaluated.
    pub node_animations: Vec<NodePose>,
    /// Indexed by [`Node::skin_instance`](crate::scene::Node::skin_instance).
    pub skins: Vec<SkinTransforms>,
}

impl ModelTransforms {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn resize(&mut self, node_count: usize) {
        self.node_local_matrices.resize(node_count, Mat4::IDENTITY);
        self.node_global_matrices.resize(node_count, Mat4::IDENTITY);
    }
}

/// Computes `global = parent * local` for every node reachable from `roots`.
///
/// Nodes are visited depth-first in pre-order with an explicit stack, so a
/// parent's global matrix is always final before any child reads it and
/// hierarchy depth is not limited by the call stack.
pub fn propagate_global(
    graph: &NodeGraph,
    root_transform: &Mat4,
    locals: &[Mat4],
    globals: &mut [Mat4],
) {
    let nodes = graph.nodes();

    // (node index, parent global matrix)
    let mut stack: Vec<(usize, Mat4)> = Vec::with_capacity(64);
    for &root in graph.roots().iter().rev() {
        stack.push((root, *root_transform));
    }

    while let Some((index, parent_global)) = stack.pop() {
        let (Some(local), Some(node)) = (locals.get(index), nodes.get(index)) else {
            continue;
        };
        let global = parent_global * *local;
        globals[index] = global;

        for &child in node.children.iter().rev() {
            stack.push((child, global));
        }
    }
}

impl NodeGraph {
    /// Evaluates the model at `time` into `transforms`.
    ///
    /// With `animation == None` the static pose is used and skin output is
    /// cleared. An out-of-range animation index falls back to the static
    /// pose.
    pub fn compute_transforms(
        &self,
        transforms: &mut ModelTransforms,
        root_transform: &Mat4,
        animation: Option<usize>,
        time: f32,
    ) {
        transforms.resize(self.node_count());

        let clip = match animation {
            Some(index) => {
                let clip = self.animations().get(index);
                if clip.is_none() {
                    log::warn!(
                        "Animation index {index} is out of range ({} animations); using the static pose",
                        self.animations().len()
                    );
                }
                clip
            }
            None => None,
        };

        match clip {
            Some(clip) => {
                clip.evaluate(self.nodes(), time, &mut transforms.node_animations);
                for ((local, pose), node) in transforms
                    .node_local_matrices
                    .iter_mut()
                    .zip(&transforms.node_animations)
                    .zip(self.nodes())
                {
                    *local = pose.to_local_matrix(&node.matrix);
                }
                transforms
                    .skins
                    .resize_with(self.skin_instance_count(), SkinTransforms::default);
            }
            None => {
                self.write_static_locals(&mut transforms.node_local_matrices);
                transforms.skins.clear();
            }
        }

        propagate_global(
            self,
            root_transform,
            &transforms.node_local_matrices,
            &mut transforms.node_global_matrices,
        );

        if transforms.skins.is_empty() {
            return;
        }

        for node in self.nodes() {
            let (Some(skin), Some(slot)) = (node.skin, node.skin_instance) else {
                continue;
            };
            let (Some(skin), Some(out)) = (self.skins().get(skin), transforms.skins.get_mut(slot))
            else {
                continue;
            };
            skin.compute_joint_matrices(
                &transforms.node_global_matrices[node.index],
                &transforms.node_global_matrices,
                out,
            );
        }
    }

    /// Whether `transforms` was produced for a graph of this size.
    #[must_use]
    pub fn compatible_with_transforms(&self, transforms: &ModelTransforms) -> bool {
        transforms.node_local_matrices.len() == self.node_count()
            && transforms.node_global_matrices.len() == self.node_count()
    }

    /// World-space box enclosing every mesh with valid bounds.
    ///
    /// Returns [`BoundingBox::EMPTY`] for a model without such meshes.
    pub fn compute_bounding_box(&self, transforms: &ModelTransforms) -> Result<BoundingBox> {
        if !self.compatible_with_transforms(transforms) {
            return Err(Error::IncompatibleTransforms {
                expected: self.node_count(),
                local: transforms.node_local_matrices.len(),
                global: transforms.node_global_matrices.len(),
            });
        }

        let mut bounds = BoundingBox::EMPTY;
        for node in self.nodes() {
            let Some(mesh) = node.mesh.and_then(|m| self.meshes().get(m)) else {
                continue;
            };
            if let Some(mesh_bounds) = mesh.valid_bounds() {
                let global = &transforms.node_global_matrices[node.index];
                bounds = bounds.union(&mesh_bounds.transform(global));
            }
        }

        Ok(bounds)
    }
}
