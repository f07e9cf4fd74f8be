//! Target population: a fixed-size set of wandering enemies inside the arena.
//!
//! Enemies walk in straight lines and bounce off the arena bounds. A kill
//! removes the target and immediately spawns a replacement, so the live count
//! never changes. Identities come from a session counter and are never reused.

use engine_core::Vec3;
use physics::BoundingSphere;
use rand::prelude::*;

use crate::config::ArenaConfig;

/// A live target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    pub id: u32,
    pub position: Vec3,
    /// Unit horizontal heading (y = 0).
    pub heading: Vec3,
}

impl Enemy {
    pub fn sphere(&self, radius: f32) -> BoundingSphere {
        BoundingSphere::new(self.position, radius)
    }
}

/// Owns the live enemy set. Iteration order is spawn order (ascending id).
pub struct EnemyPopulation {
    enemies: Vec<Enemy>,
    next_id: u32,
    half_extent: f32,
    spawn_half_extent: f32,
    eye_height: f32,
    speed: f32,
    rng: StdRng,
}

impl EnemyPopulation {
    /// Spawn the initial population from the arena config.
    pub fn new(arena: &ArenaConfig, seed: u64) -> Self {
        let mut population = Self::empty(arena, seed);
        for _ in 0..arena.enemy_count {
            population.spawn_random();
        }
        log::info!("Spawned {} enemies", population.len());
        population
    }

    /// Start from an explicit enemy set (scripted scenarios, replays).
    /// Later identities continue after the highest id given.
    pub fn from_enemies(arena: &ArenaConfig, seed: u64, enemies: Vec<Enemy>) -> Self {
        let mut population = Self::empty(arena, seed);
        population.next_id = enemies.iter().map(|e| e.id + 1).max().unwrap_or(0);
        population.enemies = enemies;
        population
    }

    fn empty(arena: &ArenaConfig, seed: u64) -> Self {
        Self {
            enemies: Vec::with_capacity(arena.enemy_count),
            next_id: 0,
            half_extent: arena.half_extent,
            spawn_half_extent: arena.spawn_half_extent.min(arena.half_extent).max(0.0),
            eye_height: arena.eye_height,
            speed: arena.enemy_speed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.enemies.iter().any(|e| e.id == id)
    }

    /// Advance every enemy by `dt` seconds, bouncing off the arena bounds.
    pub fn step(&mut self, dt: f32) {
        let bound = self.half_extent;
        let distance = self.speed * dt;
        for enemy in &mut self.enemies {
            if !enemy.position.is_finite() || !enemy.heading.is_finite() {
                continue;
            }
            enemy.position += enemy.heading * distance;
            bounce(&mut enemy.position.x, &mut enemy.heading.x, bound);
            bounce(&mut enemy.position.z, &mut enemy.heading.z, bound);
        }
    }

    /// Remove a hit enemy and spawn its replacement. Returns the replacement,
    /// or `None` if `id` is not live (nothing changes).
    pub fn kill(&mut self, id: u32) -> Option<Enemy> {
        let index = self.enemies.iter().position(|e| e.id == id)?;
        self.enemies.remove(index);
        let replacement = self.spawn_random();
        log::debug!("Enemy {} down, enemy {} spawned", id, replacement.id);
        Some(replacement)
    }

    fn spawn_random(&mut self) -> Enemy {
        let extent = self.spawn_half_extent;
        let x = self.rng.gen_range(-extent..=extent);
        let z = self.rng.gen_range(-extent..=extent);
        let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
        let enemy = Enemy {
            id: self.next_id,
            position: Vec3::new(x, self.eye_height, z),
            heading: Vec3::new(angle.cos(), 0.0, angle.sin()),
        };
        self.next_id += 1;
        self.enemies.push(enemy);
        enemy
    }
}

/// Reflect off a bound: clamp the coordinate and point the velocity back inside.
fn bounce(position: &mut f32, velocity: &mut f32, bound: f32) {
    if *position > bound {
        *position = bound;
        *velocity = -velocity.abs();
    } else if *position < -bound {
        *position = -bound;
        *velocity = velocity.abs();
    }
}
