//! Rays and ray casts for weapon hit detection.

use engine_core::Vec3;

use crate::{Aabb, BoundingSphere};

/// Result of a ray cast against a single volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec3,
    /// Outward surface normal at the hit point.
    pub normal: Vec3,
}

/// A ray with a normalised direction. Immutable once built; casts take `&self`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    /// Build a ray, normalising `direction`. Returns `None` for a zero or non-finite input.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        if !origin.is_finite() {
            log::debug!("Rejecting ray with non-finite origin {:?}", origin);
            return None;
        }
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Point at distance `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Exact ray/sphere intersection. A sphere entirely behind the origin is a miss;
    /// an origin inside the sphere reports the exit point.
    pub fn cast_sphere(&self, sphere: &BoundingSphere) -> Option<RaycastHit> {
        if !sphere.is_finite() || sphere.radius <= 0.0 {
            return None;
        }
        let to_center = sphere.center - self.origin;
        let tca = to_center.dot(self.direction);
        let d2 = to_center.length_squared() - tca * tca;
        let r2 = sphere.radius * sphere.radius;
        if d2 > r2 {
            return None;
        }
        let thc = (r2 - d2).sqrt();
        let t0 = tca - thc;
        let t1 = tca + thc;
        if t1 < 0.0 {
            return None;
        }
        let distance = if t0 < 0.0 { t1 } else { t0 };
        let point = self.at(distance);
        let normal = ((point - sphere.center) / sphere.radius).normalize_or_zero();
        Some(RaycastHit {
            distance,
            point,
            normal,
        })
    }

    /// Slab-method ray/box intersection with the normal of the face that was crossed.
    /// An origin inside the box reports the exit face.
    pub fn cast_aabb(&self, aabb: &Aabb) -> Option<RaycastHit> {
        if !aabb.is_finite() {
            return None;
        }
        let min = aabb.min().to_array();
        let max = aabb.max().to_array();
        let origin = self.origin.to_array();
        let dir = self.direction.to_array();

        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        let mut enter_axis = None;
        let mut exit_axis = None;

        for axis in 0..3 {
            if dir[axis].abs() < f32::EPSILON {
                if origin[axis] < min[axis] || origin[axis] > max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / dir[axis];
            let mut t_near = (min[axis] - origin[axis]) * inv;
            let mut t_far = (max[axis] - origin[axis]) * inv;
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }
            if t_near > t_enter {
                t_enter = t_near;
                enter_axis = Some(axis);
            }
            if t_far < t_exit {
                t_exit = t_far;
                exit_axis = Some(axis);
            }
            if t_enter > t_exit {
                return None;
            }
        }

        if t_exit < 0.0 {
            return None;
        }

        let (distance, axis, sign) = if t_enter >= 0.0 {
            // Entering face normal points against the ray.
            let axis = enter_axis?;
            (t_enter, axis, -dir[axis].signum())
        } else {
            let axis = exit_axis?;
            (t_exit, axis, dir[axis].signum())
        };

        let mut normal = [0.0; 3];
        normal[axis] = sign;
        Some(RaycastHit {
            distance,
            point: self.at(distance),
            normal: Vec3::from_array(normal),
        })
    }
}
