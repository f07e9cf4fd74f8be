//! Shooting range simulation core.
//!
//! A first-person gallery: two weapons, a wandering target population, one
//! wall, and transient hit effects, all advanced by [`session::RangeSession::tick`].

pub mod config;
pub mod effects;
pub mod enemies;
pub mod events;
pub mod hit;
pub mod player;
pub mod session;
pub mod trigger;
pub mod weapons;

pub use config::{ConfigError, RangeConfig};
pub use events::GameEvent;
pub use session::{HudReadout, RangeSession, SceneSnapshot};
pub use weapons::WeaponKind;
