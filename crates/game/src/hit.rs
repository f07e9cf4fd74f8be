//! Shot resolution against targets and the wall.
//!
//! Targets use exact ray/sphere intersection. They are tested in live-set
//! order and the first one the ray passes through wins, with no closest-hit
//! tie-break. Only if no target is hit is the wall tested. Resolution is pure:
//! the caller removes enemies and registers effects.

use engine_core::Vec3;
use physics::{Aabb, Ray};

use crate::enemies::Enemy;

/// Outcome of one shot. At most one hit per shot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitResult {
    NoHit,
    Enemy { id: u32, point: Vec3 },
    Wall { point: Vec3, normal: Vec3 },
}

/// Resolve a shot ray against the live enemies, then the wall.
///
/// Enemies with non-finite positions are skipped so one bad entity cannot
/// hide a hit on the others. Wall hits closer than `min_wall_distance` are
/// discarded as muzzle clipping.
pub fn resolve_shot(
    ray: &Ray,
    enemies: &[Enemy],
    enemy_radius: f32,
    wall: &Aabb,
    min_wall_distance: f32,
) -> HitResult {
    for enemy in enemies {
        let sphere = enemy.sphere(enemy_radius);
        if !sphere.is_finite() {
            log::warn!("Skipping enemy {} with non-finite position {:?}", enemy.id, enemy.position);
            continue;
        }
        if let Some(hit) = ray.cast_sphere(&sphere) {
            return HitResult::Enemy {
                id: enemy.id,
                point: hit.point,
            };
        }
    }

    match ray.cast_aabb(wall) {
        Some(hit) if hit.distance > min_wall_distance => HitResult::Wall {
            point: hit.point,
            normal: hit.normal,
        },
        _ => HitResult::NoHit,
    }
}
