//! Range configuration (weapons, arena, wall, player, effects). Loaded from config.ron at startup.
//!
//! All durations are integer milliseconds so game-time comparisons stay exact.

use std::path::{Path, PathBuf};
use std::time::Duration;

use engine_core::{Vec3, MAX_FIXED_RATE_HZ};
use physics::Aabb;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::weapons::WeaponKind;

/// Errors raised while reading, writing, or validating a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not access config at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config syntax in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("could not serialise config: {0}")]
    Serialize(#[from] ron::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Magazine size and fire cooldown for one weapon kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub magazine: u32,
    pub cooldown_ms: u64,
}

impl WeaponSpec {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponTable {
    #[serde(default = "default_pistol")]
    pub pistol: WeaponSpec,
    #[serde(default = "default_rifle")]
    pub rifle: WeaponSpec,
}

fn default_pistol() -> WeaponSpec {
    WeaponSpec {
        magazine: 12,
        cooldown_ms: 400,
    }
}
fn default_rifle() -> WeaponSpec {
    WeaponSpec {
        magazine: 30,
        cooldown_ms: 100,
    }
}

impl Default for WeaponTable {
    fn default() -> Self {
        Self {
            pistol: default_pistol(),
            rifle: default_rifle(),
        }
    }
}

impl WeaponTable {
    pub fn spec(&self, kind: WeaponKind) -> WeaponSpec {
        match kind {
            WeaponKind::Pistol => self.pistol,
            WeaponKind::Rifle => self.rifle,
        }
    }
}

/// Enemy arena bounds and target behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Enemies stay within [-half_extent, half_extent] on x and z.
    pub half_extent: f32,
    /// Fixed enemy y.
    pub eye_height: f32,
    pub enemy_count: usize,
    /// Units per second.
    pub enemy_speed: f32,
    pub enemy_radius: f32,
    /// Spawns land within [-spawn_half_extent, spawn_half_extent].
    pub spawn_half_extent: f32,
    /// Fixed-step rate for enemy motion.
    pub motion_hz: f64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            half_extent: 9.0,
            eye_height: 1.6,
            enemy_count: 5,
            enemy_speed: 1.5,
            enemy_radius: 0.3,
            spawn_half_extent: 8.0,
            motion_hz: 60.0,
        }
    }
}

/// The single static wall volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallConfig {
    pub center: [f32; 3],
    pub size: [f32; 3],
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0, -10.0],
            size: [20.0, 4.0, 1.0],
        }
    }
}

impl WallConfig {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_size(Vec3::from_array(self.center), Vec3::from_array(self.size))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Initial eye position.
    pub spawn: [f32; 3],
    pub move_speed: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    /// Eye height when standing on the ground.
    pub ground_height: f32,
    /// Full size of the player's collision box, centred on the eye.
    pub box_size: [f32; 3],
    /// Longest frame delta integrated in one tick.
    pub max_step_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            spawn: [0.0, 1.6, 5.0],
            move_speed: 5.0,
            gravity: 18.0,
            jump_impulse: 8.0,
            ground_height: 1.0,
            box_size: [1.0, 2.0, 1.0],
            max_step_ms: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub bullet_hole_lifetime_ms: u64,
    pub bullet_hole_fade_start_ms: u64,
    pub explosion_lifetime_ms: u64,
    pub impact_flash_lifetime_ms: u64,
    /// Radius of the random bullet-hole scatter within the wall plane.
    pub decal_spread: f32,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            bullet_hole_lifetime_ms: 3000,
            bullet_hole_fade_start_ms: 2500,
            explosion_lifetime_ms: 1000,
            impact_flash_lifetime_ms: 200,
            decal_spread: 0.18,
        }
    }
}

/// Top-level range settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeConfig {
    #[serde(default)]
    pub weapons: WeaponTable,
    #[serde(default = "default_starting_weapon")]
    pub starting_weapon: WeaponKind,
    #[serde(default = "default_reload_ms")]
    pub reload_ms: u64,
    /// Recoil magnitude set on every accepted shot.
    #[serde(default = "default_recoil_kick")]
    pub recoil_kick: f32,
    /// Wall hits closer than this are ignored.
    #[serde(default = "default_min_wall_distance")]
    pub min_wall_distance: f32,
    /// Seed for enemy spawns and decal scatter.
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub arena: ArenaConfig,
    #[serde(default)]
    pub wall: WallConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub effects: EffectsConfig,
}

fn default_starting_weapon() -> WeaponKind {
    WeaponKind::Pistol
}
fn default_reload_ms() -> u64 {
    900
}
fn default_recoil_kick() -> f32 {
    0.18
}
fn default_min_wall_distance() -> f32 {
    0.5
}
fn default_seed() -> u64 {
    0x5eed
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            weapons: WeaponTable::default(),
            starting_weapon: default_starting_weapon(),
            reload_ms: default_reload_ms(),
            recoil_kick: default_recoil_kick(),
            min_wall_distance: default_min_wall_distance(),
            seed: default_seed(),
            arena: ArenaConfig::default(),
            wall: WallConfig::default(),
            player: PlayerConfig::default(),
            effects: EffectsConfig::default(),
        }
    }
}

impl RangeConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::info!("Loaded range config from {:?}", path);
        Ok(config)
    }

    fn from_ron(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }

    /// Write the config as pretty RON.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let s = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, s).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in WeaponKind::ALL {
            let spec = self.weapons.spec(kind);
            if spec.magazine == 0 {
                let reason = format!("{} magazine must be non-zero", kind.name());
                return Err(ConfigError::Invalid(reason));
            }
            if spec.cooldown_ms == 0 {
                let reason = format!("{} cooldown must be non-zero", kind.name());
                return Err(ConfigError::Invalid(reason));
            }
        }
        if self.reload_ms == 0 {
            return Err(ConfigError::Invalid("reload_ms must be non-zero".into()));
        }
        let arena = &self.arena;
        if !(arena.half_extent > 0.0) || !(arena.spawn_half_extent > 0.0) {
            return Err(ConfigError::Invalid("arena extents must be positive".into()));
        }
        if arena.spawn_half_extent > arena.half_extent {
            return Err(ConfigError::Invalid("spawn area must lie inside the arena".into()));
        }
        if arena.enemy_count == 0 {
            return Err(ConfigError::Invalid("enemy_count must be non-zero".into()));
        }
        if !(arena.enemy_radius > 0.0) {
            return Err(ConfigError::Invalid("enemy_radius must be positive".into()));
        }
        if !(arena.motion_hz > 0.0 && arena.motion_hz <= MAX_FIXED_RATE_HZ) {
            let reason = format!("motion_hz must be in (0, {}]", MAX_FIXED_RATE_HZ);
            return Err(ConfigError::Invalid(reason));
        }
        let fx = &self.effects;
        if fx.bullet_hole_lifetime_ms == 0
            || fx.explosion_lifetime_ms == 0
            || fx.impact_flash_lifetime_ms == 0
        {
            return Err(ConfigError::Invalid("effect lifetimes must be non-zero".into()));
        }
        if fx.bullet_hole_fade_start_ms > fx.bullet_hole_lifetime_ms {
            let reason = "bullet hole fade must start before it expires";
            return Err(ConfigError::Invalid(reason.into()));
        }
        if self.player.max_step_ms == 0 {
            return Err(ConfigError::Invalid("player max_step_ms must be non-zero".into()));
        }
        Ok(())
    }

    pub fn reload_duration(&self) -> Duration {
        Duration::from_millis(self.reload_ms)
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}
