//! Collision volumes: axis-aligned boxes and bounding spheres.

use engine_core::Vec3;

/// Axis-aligned bounding box stored as center + half-extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Aabb {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
        }
    }

    /// Build a box from its center and full size along each axis.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        Self::new(center, size * 0.5)
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Overlap test. Boxes that only touch on a face still count as intersecting.
    pub fn intersects(&self, other: &Aabb) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        !(b_max.x < a_min.x
            || b_min.x > a_max.x
            || b_max.y < a_min.y
            || b_min.y > a_max.y
            || b_max.z < a_min.z
            || b_min.z > a_max.z)
    }

    /// Inclusive point containment.
    pub fn contains_point(&self, point: Vec3) -> bool {
        let (min, max) = (self.min(), self.max());
        point.cmpge(min).all() && point.cmple(max).all()
    }

    pub fn is_finite(&self) -> bool {
        self.center.is_finite() && self.half_extents.is_finite()
    }
}

/// Sphere hit volume (enemy targets).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn is_finite(&self) -> bool {
        self.center.is_finite() && self.radius.is_finite()
    }
}
