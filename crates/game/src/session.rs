//! One range session: the per-frame update that ties every system together.
//!
//! A tick runs, in order: intent intake, weapon timers and commands, player
//! motion, trigger and shot resolution, fixed-step enemy motion, and effect
//! expiry. Nothing blocks and nothing runs between ticks except
//! [`RangeSession::handle_input`], which only writes intent flags.

use std::time::Duration;

use engine_core::{Time, Transform, Vec3};
use input::{InputEvent, IntentState};
use physics::Aabb;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{ConfigError, RangeConfig};
use crate::effects::{scatter_in_plane, DecalView, EffectRegistry, ExplosionView};
use crate::enemies::EnemyPopulation;
use crate::events::GameEvent;
use crate::hit::{resolve_shot, HitResult};
use crate::player::PlayerController;
use crate::trigger::FireTrigger;
use crate::weapons::{Armory, Shot, WeaponKind};

/// Slack on the decal containment test so holes exactly on the face are kept.
const DECAL_MARGIN: f32 = 1e-3;

/// Everything the scene layer needs to draw one frame.
#[derive(Debug, Clone)]
pub struct SceneSnapshot {
    pub eye: Transform,
    pub weapon: WeaponKind,
    /// Camera-space weapon position with recoil and reload dip applied.
    pub viewmodel_offset: Vec3,
    pub enemies: Vec<(u32, Vec3)>,
    pub explosions: Vec<ExplosionView>,
    pub bullet_holes: Vec<DecalView>,
    pub impact_flashes: Vec<DecalView>,
}

/// Ammo readout for the HUD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudReadout {
    pub weapon: WeaponKind,
    pub ammo: u32,
    pub max_ammo: u32,
    pub reloading: bool,
    /// Progress of the pending reload, 0..=1.
    pub reload_fraction: Option<f32>,
    pub hits: u64,
}

pub struct RangeSession {
    config: RangeConfig,
    time: Time,
    intent: IntentState,
    player: PlayerController,
    armory: Armory,
    trigger: FireTrigger,
    enemies: EnemyPopulation,
    effects: EffectRegistry,
    wall: Aabb,
    rng: StdRng,
    hits: u64,
}

impl RangeSession {
    /// Start a session with a freshly spawned population. The config is validated first.
    pub fn new(config: RangeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let enemies = EnemyPopulation::new(&config.arena, config.seed);
        Self::with_population(config, enemies)
    }

    /// Start a session with a prepared enemy population.
    pub fn with_population(
        config: RangeConfig,
        enemies: EnemyPopulation,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut time = Time::new();
        time.set_fixed_rate(config.arena.motion_hz);
        log::info!(
            "Range session started: {} enemies, holding {}",
            enemies.len(),
            config.starting_weapon.name()
        );
        Ok(Self {
            player: PlayerController::new(&config.player),
            armory: Armory::new(&config),
            effects: EffectRegistry::new(&config.effects),
            wall: config.wall.aabb(),
            rng: StdRng::seed_from_u64(config.seed.wrapping_add(1)),
            intent: IntentState::new(),
            trigger: FireTrigger::new(),
            hits: 0,
            time,
            enemies,
            config,
        })
    }

    /// Record an input event for the next tick.
    pub fn handle_input(&mut self, event: InputEvent) {
        self.intent.apply(event);
    }

    /// Advance the simulation by one frame and return the signals it produced.
    pub fn tick(&mut self, dt: Duration) -> Vec<GameEvent> {
        self.time.advance(dt);
        let now = self.time.now();
        let dt_secs = dt.as_secs_f32();
        let frame = self.intent.take_frame();
        let mut events = Vec::new();

        self.player.look(frame.look.x, frame.look.y);

        // Weapon timers first so a finished reload is visible to this tick's commands
        if let Some(weapon) = self.armory.update(now, dt_secs) {
            events.push(GameEvent::ReloadFinished { weapon });
            self.trigger.restart(now);
        }
        if let Some(kind) = frame.weapon_select.and_then(WeaponKind::from_slot) {
            if self.armory.switch_weapon(kind) {
                events.push(GameEvent::WeaponSwitched { weapon: kind });
                self.trigger.restart(now);
            }
        }
        if frame.reload && self.armory.reload(now) {
            events.push(GameEvent::ReloadStarted {
                weapon: self.armory.current_kind(),
            });
        }

        self.player.update(&frame, dt_secs, &self.wall);

        if frame.fire_released {
            self.trigger.release();
        }
        if frame.fire_pressed {
            self.trigger.press(now);
        }
        // Shots carry their scheduled time so the cadence never rounds up to whole frames
        if let Some(due) = self.trigger.poll(now, self.armory.current().cooldown()) {
            match self.armory.fire(due, self.player.eye(), self.player.forward()) {
                Some(shot) => {
                    events.push(GameEvent::ShotFired {
                        weapon: shot.weapon,
                    });
                    self.resolve(shot, now, &mut events);
                }
                None => self.retry_when_cooled(due),
            }
        }
        if !frame.fire_held {
            self.trigger.release();
        }

        let step = self.time.fixed_timestep_seconds();
        while self.time.should_fixed_update() {
            self.enemies.step(step);
        }

        self.effects.prune(now);
        events
    }

    /// A held weapon still cooling down from an earlier shot gets its next
    /// attempt when it is ready, not a full cooldown after the rejected one.
    fn retry_when_cooled(&mut self, attempted: Duration) {
        if self.armory.is_reloading() {
            return;
        }
        let weapon = self.armory.current();
        match weapon.ready_at() {
            Some(ready) if !weapon.is_empty() && ready > attempted => {
                self.trigger.defer_until(ready)
            }
            _ => {}
        }
    }

    fn resolve(&mut self, shot: Shot, now: Duration, events: &mut Vec<GameEvent>) {
        let result = resolve_shot(
            &shot.ray,
            self.enemies.enemies(),
            self.config.arena.enemy_radius,
            &self.wall,
            self.config.min_wall_distance,
        );
        match result {
            HitResult::Enemy { id, point } => {
                if let Some(replacement) = self.enemies.kill(id) {
                    self.hits += 1;
                    self.effects.spawn_explosion(point, now);
                    events.push(GameEvent::EnemyHit {
                        id,
                        point,
                        replacement: replacement.id,
                    });
                }
            }
            HitResult::Wall { point, normal } => {
                self.effects.spawn_impact_flash(point, now);
                let spread = self.config.effects.decal_spread;
                let hole = scatter_in_plane(point, normal, spread, &mut self.rng);
                let face = Aabb::new(
                    self.wall.center,
                    self.wall.half_extents + Vec3::splat(DECAL_MARGIN),
                );
                let on_wall = face.contains_point(hole);
                if on_wall {
                    self.effects.spawn_bullet_hole(hole, now);
                }
                events.push(GameEvent::WallHit {
                    point,
                    normal,
                    decal: on_wall,
                });
            }
            HitResult::NoHit => {}
        }
    }

    /// Render-facing state at the current game time.
    pub fn snapshot(&self) -> SceneSnapshot {
        let now = self.time.now();
        SceneSnapshot {
            eye: self.player.transform,
            weapon: self.armory.current_kind(),
            viewmodel_offset: self.armory.current().viewmodel_offset(),
            enemies: self.enemies.enemies().iter().map(|e| (e.id, e.position)).collect(),
            explosions: self.effects.explosions(now),
            bullet_holes: self.effects.bullet_holes(now),
            impact_flashes: self.effects.impact_flashes(now),
        }
    }

    pub fn hud(&self) -> HudReadout {
        let weapon = self.armory.current();
        HudReadout {
            weapon: weapon.kind(),
            ammo: weapon.ammo(),
            max_ammo: weapon.max_ammo(),
            reloading: self.armory.is_reloading(),
            reload_fraction: self.armory.reload_fraction(self.time.now()),
            hits: self.hits,
        }
    }

    pub fn now(&self) -> Duration {
        self.time.now()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn armory(&self) -> &Armory {
        &self.armory
    }

    pub fn enemies(&self) -> &EnemyPopulation {
        &self.enemies
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn effects(&self) -> &EffectRegistry {
        &self.effects
    }

    pub fn wall(&self) -> &Aabb {
        &self.wall
    }
}
