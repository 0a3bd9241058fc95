//! Flat, index-stable node hierarchy of one model.
//!
//! Nodes are stored in depth-first pre-order starting from the scene roots,
//! so every parent precedes its children. Only nodes reachable from the
//! roots are kept; document indices are remapped through
//! [`NodeGraph::node_for_document_index`].

use glam::Mat4;

use crate::animation::{Animation, AnimationChannel, AnimationSampler};
use crate::assets::document::{AnimationRecord, NodeRecord, SkinRecord};
use crate::errors::{Error, Result};
use crate::resources::geometry::Mesh;
use crate::scene::node::Node;
use crate::scene::skeleton::Skin;

#[derive(Debug, Clone, Default)]
pub struct NodeGraph {
    nodes: Vec<Node>,
    roots: Vec<usize>,
    meshes: Vec<Mesh>,
    skins: Vec<Skin>,
    animations: Vec<Animation>,
    skin_instance_count: usize,
    document_to_node: Vec<Option<usize>>,
}

impl NodeGraph {
    /// Builds the hierarchy reachable from `roots` (document indices).
    ///
    /// Fails when an index is out of range or a node is reachable more than
    /// once (a cycle, a child shared by two parents, or a repeated root).
    pub fn from_records(records: &[NodeRecord], roots: &[usize]) -> Result<Self> {
        let mut document_to_node: Vec<Option<usize>> = vec![None; records.len()];
        let mut nodes: Vec<Node> = Vec::with_capacity(records.len());
        let mut graph_roots = Vec::with_capacity(roots.len());

        // (document index, parent node index)
        let mut stack: Vec<(usize, Option<usize>)> = Vec::with_capacity(64);
        for &root in roots.iter().rev() {
            stack.push((root, None));
        }

        while let Some((doc_index, parent)) = stack.pop() {
            let Some(record) = records.get(doc_index) else {
                return Err(Error::out_of_bounds("node", doc_index));
            };
            if document_to_node[doc_index].is_some() {
                return Err(Error::InvalidNodeGraph { node: doc_index });
            }

            let index = nodes.len();
            document_to_node[doc_index] = Some(index);

            let mut node = Node::new(index);
            node.name.clone_from(&record.name);
            node.translation = record.translation;
            node.rotation = record.rotation;
            node.scale = record.scale;
            node.mesh = record.mesh;
            node.skin = record.skin;
            node.parent = parent;
            if let Some(matrix) = record.matrix {
                if node.static_pose().is_identity() {
                    node.matrix = matrix;
                } else {
                    log::warn!(
                        "Node {doc_index} defines both a matrix and TRS properties; the matrix is ignored"
                    );
                }
            }
            nodes.push(node);

            match parent {
                Some(p) => nodes[p].children.push(index),
                None => graph_roots.push(index),
            }

            for &child in record.children.iter().rev() {
                stack.push((child, Some(index)));
            }
        }

        let mut skin_instance_count = 0;
        for node in &mut nodes {
            if node.is_skinned_mesh() {
                node.skin_instance = Some(skin_instance_count);
                skin_instance_count += 1;
            }
        }

        Ok(Self {
            nodes,
            roots: graph_roots,
            meshes: Vec::new(),
            skins: Vec::new(),
            animations: Vec::new(),
            skin_instance_count,
            document_to_node,
        })
    }

    /// Roots when the document declares no scene: every node nobody lists
    /// as a child, in document order.
    #[must_use]
    pub fn parentless_roots(records: &[NodeRecord]) -> Vec<usize> {
        let mut has_parent = vec![false; records.len()];
        for record in records {
            for &child in &record.children {
                if let Some(flag) = has_parent.get_mut(child) {
                    *flag = true;
                }
            }
        }
        (0..records.len()).filter(|&i| !has_parent[i]).collect()
    }

    #[inline]
    #[must_use]
    pub fn node_for_document_index(&self, doc_index: usize) -> Option<usize> {
        self.document_to_node.get(doc_index).copied().flatten()
    }

    // ========================================================================
    // Attachments
    // ========================================================================

    /// Installs the model's meshes. Every node's mesh index must be valid.
    pub fn set_meshes(&mut self, meshes: Vec<Mesh>) -> Result<()> {
        for node in &self.nodes {
            if let Some(mesh) = node.mesh
                && mesh >= meshes.len()
            {
                return Err(Error::out_of_bounds(
                    format!("mesh referenced by node {}", node.index),
                    mesh,
                ));
            }
        }
        self.meshes = meshes;
        Ok(())
    }

    /// Installs the model's skins, remapping joint indices into this graph.
    pub fn set_skins(&mut self, records: &[SkinRecord]) -> Result<()> {
        for node in &self.nodes {
            if let Some(skin) = node.skin
                && skin >= records.len()
            {
                return Err(Error::out_of_bounds(
                    format!("skin referenced by node {}", node.index),
                    skin,
                ));
            }
        }

        let mut skins = Vec::with_capacity(records.len());
        for (skin_index, record) in records.iter().enumerate() {
            let joints = record
                .joints
                .iter()
                .map(|&joint| {
                    self.node_for_document_index(joint).ok_or_else(|| {
                        Error::out_of_bounds(format!("joint of skin {skin_index}"), joint)
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            let skeleton = record
                .skeleton
                .and_then(|root| self.node_for_document_index(root));

            let name = record
                .name
                .clone()
                .unwrap_or_else(|| format!("Skin_{skin_index}"));
            skins.push(Skin::new(
                &name,
                skin_index,
                joints,
                record.inverse_bind_matrices.clone(),
                skeleton,
            )?);
        }

        self.skins = skins;
        Ok(())
    }

    /// Converts and appends an animation clip.
    ///
    /// A channel referencing a sampler the clip does not have is malformed
    /// input. Channels targeting nodes outside this scene are dropped.
    pub fn add_animation(&mut self, index: usize, record: AnimationRecord) -> Result<()> {
        let name = record
            .name
            .unwrap_or_else(|| format!("Animation_{index}"));

        let mut channels = Vec::with_capacity(record.channels.len());
        for channel in &record.channels {
            if channel.sampler >= record.samplers.len() {
                return Err(Error::out_of_bounds(
                    format!("sampler of animation '{name}'"),
                    channel.sampler,
                ));
            }
            let Some(node) = channel
                .target_node
                .and_then(|doc| self.node_for_document_index(doc))
            else {
                log::debug!("Animation '{name}': channel target is not part of the scene");
                continue;
            };
            channels.push(AnimationChannel {
                sampler: channel.sampler,
                node,
                target: channel.path,
            });
        }

        let samplers = record
            .samplers
            .into_iter()
            .map(|s| AnimationSampler::new(s.inputs, s.outputs, s.interpolation))
            .collect();

        self.animations.push(Animation::new(name, samplers, channels));
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    #[must_use]
    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    #[inline]
    #[must_use]
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    #[inline]
    #[must_use]
    pub fn skins(&self) -> &[Skin] {
        &self.skins
    }

    #[inline]
    #[must_use]
    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    #[inline]
    #[must_use]
    pub fn skin_instance_count(&self) -> usize {
        self.skin_instance_count
    }

    pub fn find_node_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name.as_deref() == Some(name))
    }

    /// Rest-pose local matrices of every node.
    pub(crate) fn write_static_locals(&self, locals: &mut [Mat4]) {
        for (local, node) in locals.iter_mut().zip(&self.nodes) {
            *local = node.local_matrix();
        }
    }
}
