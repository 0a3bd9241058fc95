use glam::Mat4;

use crate::errors::{Error, Result};

/// A skin: the joint nodes driving a mesh and their inverse bind matrices.
///
/// `joints[i]` pairs with `inverse_bind_matrices[i]`; both arrays always
/// have the same length.
#[derive(Debug, Clone)]
pub struct Skin {
    pub name: String,
    joints: Vec<usize>,
    inverse_bind_matrices: Vec<Mat4>,
    /// Common root of the joint hierarchy, when the source names one.
    pub skeleton: Option<usize>,
}

impl Skin {
    /// Builds a skin. Missing inverse bind matrices default to identity.
    pub fn new(
        name: &str,
        index: usize,
        joints: Vec<usize>,
        inverse_bind_matrices: Option<Vec<Mat4>>,
        skeleton: Option<usize>,
    ) -> Result<Self> {
        let inverse_bind_matrices =
            inverse_bind_matrices.unwrap_or_else(|| vec![Mat4::IDENTITY; joints.len()]);

        if inverse_bind_matrices.len() != joints.len() {
            return Err(Error::SkinJointMismatch {
                skin: index,
                joints: joints.len(),
                matrices: inverse_bind_matrices.len(),
            });
        }

        Ok(Self {
            name: name.to_string(),
            joints,
            inverse_bind_matrices,
            skeleton,
        })
    }

    #[inline]
    #[must_use]
    pub fn joints(&self) -> &[usize] {
        &self.joints
    }

    #[inline]
    #[must_use]
    pub fn inverse_bind_matrices(&self) -> &[Mat4] {
        &self.inverse_bind_matrices
    }

    #[inline]
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Writes one skinning matrix per joint into `out`.
    ///
    /// `joint[i] = inverse(mesh_global) * global[joints[i]] * ibm[i]`: a
    /// bind-pose vertex is moved into joint space, posed, then brought back
    /// into the mesh node's space. `out` is reallocated only when its length
    /// differs from the joint count.
    pub fn compute_joint_matrices(
        &self,
        mesh_global: &Mat4,
        node_globals: &[Mat4],
        out: &mut SkinTransforms,
    ) {
        let count = self.joints.len();
        if out.joint_matrices.len() != count {
            out.joint_matrices.resize(count, Mat4::IDENTITY);
        }

        let mesh_global_inv = mesh_global.inverse();

        for (i, (&joint, ibm)) in self
            .joints
            .iter()
            .zip(&self.inverse_bind_matrices)
            .enumerate()
        {
            // Joint indices are validated at load time.
            let joint_global = node_globals.get(joint).copied().unwrap_or(Mat4::IDENTITY);
            out.joint_matrices[i] = mesh_global_inv * joint_global * *ibm;
        }
    }
}

/// Per-instance skinning output.
#[derive(Debug, Clone, Default)]
pub struct SkinTransforms {
    pub joint_matrices: Vec<Mat4>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn missing_ibm_defaults_to_identity() {
        let skin = Skin::new("s", 0, vec![0, 1], None, None).unwrap();
        assert_eq!(skin.inverse_bind_matrices(), &[Mat4::IDENTITY; 2]);
    }

    #[test]
    fn mismatched_ibm_is_rejected() {
        let err = Skin::new("s", 3, vec![0, 1], Some(vec![Mat4::IDENTITY]), None).unwrap_err();
        assert!(matches!(
            err,
            Error::SkinJointMismatch {
                skin: 3,
                joints: 2,
                matrices: 1
            }
        ));
    }

    #[test]
    fn joint_array_keeps_allocation_when_length_matches() {
        let skin = Skin::new("s", 0, vec![0], None, None).unwrap();
        let globals = [Mat4::from_translation(Vec3::X)];
        let mut out = SkinTransforms {
            joint_matrices: Vec::with_capacity(8),
        };
        out.joint_matrices.push(Mat4::ZERO);
        let ptr = out.joint_matrices.as_ptr();

        skin.compute_joint_matrices(&Mat4::IDENTITY, &globals, &mut out);

        assert_eq!(out.joint_matrices.as_ptr(), ptr);
        assert_eq!(out.joint_matrices[0], globals[0]);
    }
}
