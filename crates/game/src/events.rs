//! One-shot signals emitted by a tick for the audio, UI, and score layers.

use engine_core::Vec3;

use crate::weapons::WeaponKind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A shot was accepted by the armory.
    ShotFired { weapon: WeaponKind },
    /// A target was destroyed and replaced.
    EnemyHit {
        id: u32,
        point: Vec3,
        replacement: u32,
    },
    /// A shot struck the wall. `decal` is false when the scattered hole fell off the wall.
    WallHit {
        point: Vec3,
        normal: Vec3,
        decal: bool,
    },
    ReloadStarted { weapon: WeaponKind },
    ReloadFinished { weapon: WeaponKind },
    WeaponSwitched { weapon: WeaponKind },
}

impl GameEvent {
    /// Score increment carried by this event.
    pub fn score(&self) -> u32 {
        match self {
            GameEvent::EnemyHit { .. } => 1,
            _ => 0,
        }
    }
}
