use glam::{Mat4, Quat, Vec3};

/// Translation, rotation and scale of a single node.
///
/// Used both for the static rest pose stored on a node and for the working
/// pose written by animation sampling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePose {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for NodePose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl NodePose {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[inline]
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.translation == Vec3::ZERO
            && self.rotation == Quat::IDENTITY
            && self.scale == Vec3::ONE
    }

    /// Local matrix of this pose applied after `matrix`.
    #[inline]
    #[must_use]
    pub fn to_local_matrix(&self, matrix: &Mat4) -> Mat4 {
        compute_local_matrix(self.scale, self.rotation, self.translation, matrix)
    }
}

/// Builds a node's local matrix.
///
/// A point is scaled first, then rotated, then translated, then transformed
/// by `matrix`: `matrix * T * R * S`. Factors equal to their identity value
/// are skipped.
#[must_use]
pub fn compute_local_matrix(scale: Vec3, rotation: Quat, translation: Vec3, matrix: &Mat4) -> Mat4 {
    let mut local = *matrix;

    if translation != Vec3::ZERO {
        local *= Mat4::from_translation(translation);
    }
    if rotation != Quat::IDENTITY {
        local *= Mat4::from_quat(rotation);
    }
    if scale != Vec3::ONE {
        local *= Mat4::from_scale(scale);
    }

    local
}
