use glam::{Mat4, Vec3};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl BoundingBox {
    /// Inverted box; the identity for [`union`](Self::union).
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.cmple(self.max).all()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[must_use]
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Box enclosing all eight transformed corners.
    #[must_use]
    pub fn transform(&self, matrix: &Mat4) -> Self {
        (0..8u32).fold(Self::EMPTY, |acc, corner| {
            let point = Vec3::select(
                glam::BVec3::new(corner & 1 != 0, corner & 2 != 0, corner & 4 != 0),
                self.max,
                self.min,
            );
            let p = matrix.transform_point3(point);
            Self {
                min: acc.min.min(p),
                max: acc.max.max(p),
            }
        })
    }
}

/// A mesh's slice of the model's shared vertex and index buffers.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub name: Option<String>,
    pub bounds: Option<BoundingBox>,
    pub first_index: u32,
    pub index_count: u32,
    /// Indices in the shared buffer already include this offset.
    pub first_vertex: u32,
    pub vertex_count: u32,
}

impl Mesh {
    #[inline]
    #[must_use]
    pub fn valid_bounds(&self) -> Option<&BoundingBox> {
        self.bounds.as_ref().filter(|b| b.is_valid())
    }
}
