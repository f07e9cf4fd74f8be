//! Transient effects: explosions, bullet holes, and impact flashes.
//!
//! Each effect is an entity with a position, a game-time [`Lifetime`], and a
//! kind marker. Age and opacity are pure functions of the current game time,
//! and views filter out anything already past its lifetime, so results do not
//! depend on when the last prune ran.

use std::time::Duration;

use engine_core::{EffectPosition, Lifetime, Vec3};
use hecs::World;
use rand::Rng;

use crate::config::EffectsConfig;

/// Explosion marker with a session-unique id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Explosion {
    pub id: u64,
}

/// Wall decal marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulletHole;

/// Short flash at the exact wall impact point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImpactFlash;

/// Render-facing view of a decal or flash.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecalView {
    pub position: Vec3,
    pub opacity: f32,
}

/// Render-facing view of an explosion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplosionView {
    pub id: u64,
    pub position: Vec3,
    pub opacity: f32,
    /// Grows linearly with age.
    pub scale: f32,
}

/// Opacity for an effect of age `age`: 1.0 until `fade_start`, then a linear
/// ramp to 0.0 at `lifetime`.
pub fn fade_opacity(age: Duration, fade_start: Duration, lifetime: Duration) -> f32 {
    if age <= fade_start {
        return 1.0;
    }
    if age >= lifetime {
        return 0.0;
    }
    let span = (lifetime - fade_start).as_secs_f32();
    1.0 - (age - fade_start).as_secs_f32() / span
}

/// Random point within `spread` of `point`, in the plane with normal `normal`.
pub fn scatter_in_plane(point: Vec3, normal: Vec3, spread: f32, rng: &mut impl Rng) -> Vec3 {
    let normal = normal.normalize_or_zero();
    if normal == Vec3::ZERO || spread <= 0.0 {
        return point;
    }
    let reference = if normal.dot(Vec3::X).abs() > 0.99 { Vec3::Y } else { Vec3::X };
    let tangent = normal.cross(reference).normalize();
    let bitangent = normal.cross(tangent).normalize();
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let radius = rng.gen::<f32>() * spread;
    point + tangent * (angle.cos() * radius) + bitangent * (angle.sin() * radius)
}

/// Registry of live transient effects.
pub struct EffectRegistry {
    world: World,
    next_explosion_id: u64,
    explosion_lifetime: Duration,
    bullet_hole_lifetime: Duration,
    bullet_hole_fade_start: Duration,
    flash_lifetime: Duration,
}

impl EffectRegistry {
    pub fn new(config: &EffectsConfig) -> Self {
        Self {
            world: World::new(),
            next_explosion_id: 0,
            explosion_lifetime: Duration::from_millis(config.explosion_lifetime_ms),
            bullet_hole_lifetime: Duration::from_millis(config.bullet_hole_lifetime_ms),
            bullet_hole_fade_start: Duration::from_millis(config.bullet_hole_fade_start_ms),
            flash_lifetime: Duration::from_millis(config.impact_flash_lifetime_ms),
        }
    }

    pub fn spawn_explosion(&mut self, position: Vec3, now: Duration) -> u64 {
        let id = self.next_explosion_id;
        self.next_explosion_id += 1;
        self.world.spawn((
            Explosion { id },
            EffectPosition(position),
            Lifetime::new(now, self.explosion_lifetime),
        ));
        id
    }

    pub fn spawn_bullet_hole(&mut self, position: Vec3, now: Duration) {
        self.world.spawn((
            BulletHole,
            EffectPosition(position),
            Lifetime::new(now, self.bullet_hole_lifetime),
        ));
    }

    pub fn spawn_impact_flash(&mut self, position: Vec3, now: Duration) {
        self.world.spawn((
            ImpactFlash,
            EffectPosition(position),
            Lifetime::new(now, self.flash_lifetime),
        ));
    }

    /// Despawn every effect whose age exceeds its lifetime. Returns how many were removed.
    pub fn prune(&mut self, now: Duration) -> usize {
        let expired: Vec<hecs::Entity> = self
            .world
            .query::<&Lifetime>()
            .iter()
            .filter(|(_, lifetime)| lifetime.is_expired(now))
            .map(|(entity, _)| entity)
            .collect();
        for &entity in &expired {
            self.world.despawn(entity).ok();
        }
        expired.len()
    }

    /// Live explosions at `now`, oldest first.
    pub fn explosions(&self, now: Duration) -> Vec<ExplosionView> {
        let mut views: Vec<ExplosionView> = self
            .world
            .query::<(&Explosion, &EffectPosition, &Lifetime)>()
            .iter()
            .filter(|(_, (_, _, lifetime))| !lifetime.is_expired(now))
            .map(|(_, (explosion, position, lifetime))| {
                let age = lifetime.age(now);
                ExplosionView {
                    id: explosion.id,
                    position: position.0,
                    opacity: fade_opacity(age, Duration::ZERO, lifetime.duration()),
                    scale: 1.0 + age.as_secs_f32() * 2.0,
                }
            })
            .collect();
        views.sort_by_key(|v| v.id);
        views
    }

    /// Live bullet holes at `now`, oldest first.
    pub fn bullet_holes(&self, now: Duration) -> Vec<DecalView> {
        self.decals::<BulletHole>(now, self.bullet_hole_fade_start)
    }

    /// Live impact flashes at `now`, oldest first.
    pub fn impact_flashes(&self, now: Duration) -> Vec<DecalView> {
        self.decals::<ImpactFlash>(now, Duration::ZERO)
    }

    fn decals<K: hecs::Component>(&self, now: Duration, fade_start: Duration) -> Vec<DecalView> {
        let mut live: Vec<(Duration, DecalView)> = self
            .world
            .query::<(&K, &EffectPosition, &Lifetime)>()
            .iter()
            .filter(|(_, (_, _, lifetime))| !lifetime.is_expired(now))
            .map(|(_, (_, position, lifetime))| {
                let opacity = fade_opacity(lifetime.age(now), fade_start, lifetime.duration());
                (lifetime.born(), DecalView {
                    position: position.0,
                    opacity,
                })
            })
            .collect();
        live.sort_by_key(|(born, _)| *born);
        live.into_iter().map(|(_, view)| view).collect()
    }

    /// Number of effect entities, including any expired but not yet pruned.
    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn registry() -> EffectRegistry {
        EffectRegistry::new(&EffectsConfig::default())
    }

    #[test]
    fn bullet_hole_present_before_and_absent_after_lifetime() {
        let mut fx = registry();
        fx.spawn_bullet_hole(Vec3::new(1.0, 1.0, -9.5), ms(1000));
        assert_eq!(fx.bullet_holes(ms(3999)).len(), 1);
        assert_eq!(fx.bullet_holes(ms(4001)).len(), 0);
        // Views filter even before pruning.
        assert_eq!(fx.len(), 1);
        assert_eq!(fx.prune(ms(3999)), 0);
        assert_eq!(fx.prune(ms(4001)), 1);
        assert!(fx.is_empty());
    }

    #[test]
    fn bullet_hole_fades_over_final_half_second() {
        let mut fx = registry();
        fx.spawn_bullet_hole(Vec3::ZERO, ms(0));
        assert_eq!(fx.bullet_holes(ms(2500))[0].opacity, 1.0);
        let mid = fx.bullet_holes(ms(2750))[0].opacity;
        assert!((mid - 0.5).abs() < 1e-4);
        assert_eq!(fx.bullet_holes(ms(3000))[0].opacity, 0.0);
    }

    #[test]
    fn explosion_fades_and_grows() {
        let mut fx = registry();
        let id = fx.spawn_explosion(Vec3::new(0.0, 1.6, 0.3), ms(500));
        let view = fx.explosions(ms(1000))[0];
        assert_eq!(view.id, id);
        assert!((view.opacity - 0.5).abs() < 1e-4);
        assert!((view.scale - 2.0).abs() < 1e-4);
        assert!(fx.explosions(ms(1501)).is_empty());
    }

    #[test]
    fn explosion_ids_are_unique() {
        let mut fx = registry();
        let a = fx.spawn_explosion(Vec3::ZERO, ms(0));
        let b = fx.spawn_explosion(Vec3::ZERO, ms(0));
        assert_ne!(a, b);
        let ids: Vec<u64> = fx.explosions(ms(10)).iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn prune_leaves_other_kinds_untouched() {
        let mut fx = registry();
        fx.spawn_impact_flash(Vec3::ZERO, ms(0));
        fx.spawn_bullet_hole(Vec3::ZERO, ms(0));
        fx.spawn_explosion(Vec3::ZERO, ms(0));
        assert_eq!(fx.prune(ms(300)), 1);
        assert!(fx.impact_flashes(ms(300)).is_empty());
        assert_eq!(fx.bullet_holes(ms(300)).len(), 1);
        assert_eq!(fx.explosions(ms(300)).len(), 1);
        assert_eq!(fx.prune(ms(1200)), 1);
        assert_eq!(fx.len(), 1);
    }

    #[test]
    fn decals_are_listed_oldest_first() {
        let mut fx = registry();
        fx.spawn_bullet_hole(Vec3::X, ms(200));
        fx.spawn_bullet_hole(Vec3::Y, ms(100));
        let holes = fx.bullet_holes(ms(300));
        assert_eq!(holes[0].position, Vec3::Y);
        assert_eq!(holes[1].position, Vec3::X);
    }

    #[test]
    fn scatter_stays_in_plane_and_within_spread() {
        let mut rng = StdRng::seed_from_u64(9);
        let point = Vec3::new(2.0, 1.0, -9.5);
        for _ in 0..200 {
            let p = scatter_in_plane(point, Vec3::Z, 0.18, &mut rng);
            assert!((p.z - point.z).abs() < 1e-5);
            assert!((p - point).length() <= 0.18 + 1e-5);
        }
    }

    #[test]
    fn scatter_handles_normal_parallel_to_x() {
        let mut rng = StdRng::seed_from_u64(1);
        let p = scatter_in_plane(Vec3::ZERO, Vec3::X, 0.18, &mut rng);
        assert!(p.x.abs() < 1e-6);
        assert!(p.is_finite());
    }
}
