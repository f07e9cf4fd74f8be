//! Weapon state machine: ammo, fire cooldown, reload timing, and viewmodel kick.
//!
//! The armory is the single authority on "can I fire now?". Every check runs
//! against game time, so a weapon behaves the same at 30 or 240 frames per
//! second. Firing is instantaneous (it never lingers as a state); the only
//! persistent phases are [`WeaponPhase::Idle`] and [`WeaponPhase::Reloading`].

use std::time::Duration;

use engine_core::{decay_toward_zero, per_frame_factor_to_rate, Vec3};
use physics::Ray;
use serde::{Deserialize, Serialize};

use crate::config::{RangeConfig, WeaponSpec};

/// Camera-space rest position of the held weapon.
pub const VIEWMODEL_REST: Vec3 = Vec3::new(0.5, -0.6, -1.2);
/// How far the weapon dips at the middle of the reload animation.
const RELOAD_DROP: f32 = 0.7;
const RECOIL_SNAP: f32 = 0.001;
const RELOAD_OFFSET_SNAP: f32 = 0.01;
/// Recoil keeps 70% per 60 Hz frame; the reload offset keeps 82%.
const RECOIL_FRAME_FACTOR: f32 = 0.7;
const RELOAD_FRAME_FACTOR: f32 = 0.82;
const REFERENCE_FRAME_HZ: f32 = 60.0;

/// Weapon kinds available on the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Semi-automatic sidearm - small magazine, slow cadence.
    Pistol,
    /// Automatic rifle - large magazine, fast cadence.
    Rifle,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 2] = [WeaponKind::Pistol, WeaponKind::Rifle];

    /// Weapon in a zero-based selection slot.
    pub fn from_slot(slot: u8) -> Option<Self> {
        Self::ALL.get(slot as usize).copied()
    }

    fn index(self) -> usize {
        match self {
            WeaponKind::Pistol => 0,
            WeaponKind::Rifle => 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WeaponKind::Pistol => "pistol",
            WeaponKind::Rifle => "rifle",
        }
    }
}

/// One weapon's ammo, timing, and animation state.
#[derive(Debug, Clone)]
pub struct Weapon {
    kind: WeaponKind,
    max_ammo: u32,
    cooldown: Duration,
    ammo: u32,
    last_fire: Option<Duration>,
    /// Recoil kick, set on fire and decaying toward zero.
    recoil: f32,
    /// Reload animation drive, 1.0 at reload start and decaying toward zero.
    reload_offset: f32,
}

impl Weapon {
    /// Weapons start with a full magazine.
    pub fn new(kind: WeaponKind, spec: WeaponSpec) -> Self {
        Self {
            kind,
            max_ammo: spec.magazine,
            cooldown: spec.cooldown(),
            ammo: spec.magazine,
            last_fire: None,
            recoil: 0.0,
            reload_offset: 0.0,
        }
    }

    pub fn kind(&self) -> WeaponKind {
        self.kind
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn max_ammo(&self) -> u32 {
        self.max_ammo
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn last_fire(&self) -> Option<Duration> {
        self.last_fire
    }

    pub fn recoil(&self) -> f32 {
        self.recoil
    }

    pub fn reload_offset(&self) -> f32 {
        self.reload_offset
    }

    pub fn is_empty(&self) -> bool {
        self.ammo == 0
    }

    /// True once a full cooldown has elapsed since the last accepted shot.
    pub fn cooldown_elapsed(&self, now: Duration) -> bool {
        match self.last_fire {
            Some(last) => now.saturating_sub(last) >= self.cooldown,
            None => true,
        }
    }

    /// Earliest game time the next shot can be accepted, if one was ever fired.
    pub fn ready_at(&self) -> Option<Duration> {
        self.last_fire.map(|last| last + self.cooldown)
    }

    /// Camera-space weapon placement with reload dip and recoil kick applied.
    pub fn viewmodel_offset(&self) -> Vec3 {
        let mut offset = VIEWMODEL_REST;
        offset.y -= (self.reload_offset * std::f32::consts::PI).sin() * RELOAD_DROP;
        offset.z -= self.recoil;
        offset
    }

    fn decay(&mut self, dt: f32, rates: &DecayRates) {
        self.recoil = decay_toward_zero(self.recoil, rates.recoil, dt, RECOIL_SNAP);
        self.reload_offset =
            decay_toward_zero(self.reload_offset, rates.reload_offset, dt, RELOAD_OFFSET_SNAP);
    }
}

#[derive(Debug, Clone, Copy)]
struct DecayRates {
    recoil: f32,
    reload_offset: f32,
}

/// Armory phase. A reload is bound to the weapon it started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponPhase {
    Idle,
    Reloading {
        weapon: WeaponKind,
        started_at: Duration,
        completes_at: Duration,
    },
}

/// An accepted shot: the aim ray for the hit resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub weapon: WeaponKind,
    pub ray: Ray,
}

/// All weapons for a session plus which one is held.
#[derive(Debug, Clone)]
pub struct Armory {
    weapons: [Weapon; 2],
    current: WeaponKind,
    phase: WeaponPhase,
    reload_duration: Duration,
    recoil_kick: f32,
    rates: DecayRates,
}

impl Armory {
    pub fn new(config: &RangeConfig) -> Self {
        let weapons = WeaponKind::ALL.map(|kind| Weapon::new(kind, config.weapons.spec(kind)));
        Self {
            weapons,
            current: config.starting_weapon,
            phase: WeaponPhase::Idle,
            reload_duration: config.reload_duration(),
            recoil_kick: config.recoil_kick,
            rates: DecayRates {
                recoil: per_frame_factor_to_rate(RECOIL_FRAME_FACTOR, REFERENCE_FRAME_HZ),
                reload_offset: per_frame_factor_to_rate(RELOAD_FRAME_FACTOR, REFERENCE_FRAME_HZ),
            },
        }
    }

    pub fn current(&self) -> &Weapon {
        self.weapon(self.current)
    }

    pub fn current_kind(&self) -> WeaponKind {
        self.current
    }

    pub fn weapon(&self, kind: WeaponKind) -> &Weapon {
        &self.weapons[kind.index()]
    }

    fn weapon_mut(&mut self, kind: WeaponKind) -> &mut Weapon {
        &mut self.weapons[kind.index()]
    }

    pub fn phase(&self) -> WeaponPhase {
        self.phase
    }

    pub fn is_reloading(&self) -> bool {
        matches!(self.phase, WeaponPhase::Reloading { .. })
    }

    /// Fraction of the pending reload elapsed at `now`, if one is pending.
    pub fn reload_fraction(&self, now: Duration) -> Option<f32> {
        match self.phase {
            WeaponPhase::Reloading { started_at, completes_at, .. } => {
                let total = completes_at.saturating_sub(started_at).as_secs_f32();
                let elapsed = now.saturating_sub(started_at).as_secs_f32();
                Some(if total > 0.0 { (elapsed / total).min(1.0) } else { 1.0 })
            }
            WeaponPhase::Idle => None,
        }
    }

    /// Try to fire the held weapon.
    ///
    /// Rejected with no side effect while reloading, with an empty magazine,
    /// inside the cooldown window, or when `forward` is degenerate. An accepted
    /// shot consumes exactly one round and yields exactly one ray.
    pub fn fire(&mut self, now: Duration, eye: Vec3, forward: Vec3) -> Option<Shot> {
        self.settle(now);
        if self.is_reloading() {
            return None;
        }
        let kick = self.recoil_kick;
        let weapon = self.weapon_mut(self.current);
        if weapon.is_empty() || !weapon.cooldown_elapsed(now) {
            return None;
        }
        let ray = Ray::new(eye, forward)?;
        weapon.ammo -= 1;
        weapon.last_fire = Some(now);
        weapon.recoil = kick;
        log::debug!("{} fired, {} rounds left", weapon.kind.name(), weapon.ammo);
        Some(Shot {
            weapon: weapon.kind,
            ray,
        })
    }

    /// Hold a different weapon. Rejected when it is already held or its magazine is empty.
    ///
    /// Cooldown and recoil of both weapons carry over. A pending reload of the
    /// weapon being put away is cancelled.
    pub fn switch_weapon(&mut self, kind: WeaponKind) -> bool {
        if kind == self.current || self.weapon(kind).is_empty() {
            return false;
        }
        if let WeaponPhase::Reloading { weapon, .. } = self.phase {
            log::debug!("{} reload cancelled by weapon switch", weapon.name());
            self.phase = WeaponPhase::Idle;
        }
        self.current = kind;
        true
    }

    /// Start reloading the held weapon. Rejected while a reload is pending.
    pub fn reload(&mut self, now: Duration) -> bool {
        self.settle(now);
        if self.is_reloading() {
            return false;
        }
        let completes_at = now + self.reload_duration;
        self.phase = WeaponPhase::Reloading {
            weapon: self.current,
            started_at: now,
            completes_at,
        };
        self.weapon_mut(self.current).reload_offset = 1.0;
        true
    }

    /// Complete a due reload and decay animation state. Returns the weapon whose reload finished.
    pub fn update(&mut self, now: Duration, dt: f32) -> Option<WeaponKind> {
        let finished = self.settle(now);
        let rates = self.rates;
        for weapon in &mut self.weapons {
            weapon.decay(dt, &rates);
        }
        finished
    }

    fn settle(&mut self, now: Duration) -> Option<WeaponKind> {
        match self.phase {
            WeaponPhase::Reloading { weapon, completes_at, .. } if now >= completes_at => {
                let w = self.weapon_mut(weapon);
                w.ammo = w.max_ammo;
                self.phase = WeaponPhase::Idle;
                log::info!("{} reloaded", weapon.name());
                Some(weapon)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EYE: Vec3 = Vec3::new(0.0, 1.6, 5.0);

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn rifle_armory() -> Armory {
        let config = RangeConfig {
            starting_weapon: WeaponKind::Rifle,
            ..Default::default()
        };
        Armory::new(&config)
    }

    #[test]
    fn weapons_start_full() {
        let armory = Armory::new(&RangeConfig::default());
        assert_eq!(armory.current_kind(), WeaponKind::Pistol);
        assert_eq!(armory.weapon(WeaponKind::Pistol).ammo(), 12);
        assert_eq!(armory.weapon(WeaponKind::Rifle).ammo(), 30);
        assert_eq!(armory.phase(), WeaponPhase::Idle);
    }

    #[test]
    fn rifle_empties_after_thirty_shots() {
        let mut armory = rifle_armory();
        let accepted = (0..31)
            .filter(|&i| armory.fire(ms(100 * i), EYE, Vec3::NEG_Z).is_some())
            .count();
        assert_eq!(accepted, 30);
        assert_eq!(armory.current().ammo(), 0);
    }

    #[test]
    fn fire_within_cooldown_is_rejected() {
        let mut armory = rifle_armory();
        assert!(armory.fire(ms(1000), EYE, Vec3::NEG_Z).is_some());
        assert!(armory.fire(ms(1000), EYE, Vec3::NEG_Z).is_none());
        assert!(armory.fire(ms(1099), EYE, Vec3::NEG_Z).is_none());
        assert_eq!(armory.current().ammo(), 29);
        assert!(armory.fire(ms(1100), EYE, Vec3::NEG_Z).is_some());
    }

    #[test]
    fn ready_at_tracks_last_accepted_shot() {
        let mut armory = Armory::new(&RangeConfig::default());
        assert_eq!(armory.current().ready_at(), None);
        armory.fire(ms(16), EYE, Vec3::NEG_Z);
        assert_eq!(armory.current().ready_at(), Some(ms(416)));
        // A rejected attempt leaves it alone
        armory.fire(ms(48), EYE, Vec3::NEG_Z);
        assert_eq!(armory.current().ready_at(), Some(ms(416)));
    }

    #[test]
    fn accepted_shots_respect_cooldown_under_jittered_ticks() {
        let mut armory = rifle_armory();
        let mut now = Duration::ZERO;
        let mut shots = Vec::new();
        for i in 0..400u64 {
            now += ms(3 + (i * 7) % 29);
            if armory.fire(now, EYE, Vec3::NEG_Z).is_some() {
                shots.push(now);
            }
            assert!(armory.current().ammo() <= armory.current().max_ammo());
        }
        assert_eq!(shots.len(), 30);
        for pair in shots.windows(2) {
            assert!(pair[1] - pair[0] >= ms(100));
        }
    }

    #[test]
    fn shot_ray_is_normalized_from_eye() {
        let mut armory = Armory::new(&RangeConfig::default());
        let shot = armory.fire(ms(0), EYE, Vec3::new(0.0, 0.0, -7.0)).unwrap();
        assert_eq!(shot.weapon, WeaponKind::Pistol);
        assert_eq!(shot.ray.origin(), EYE);
        assert!((shot.ray.direction() - Vec3::NEG_Z).length() < 1e-6);
        assert!((armory.current().recoil() - 0.18).abs() < 1e-6);
    }

    #[test]
    fn degenerate_aim_is_rejected_without_side_effects() {
        let mut armory = Armory::new(&RangeConfig::default());
        assert!(armory.fire(ms(0), EYE, Vec3::ZERO).is_none());
        assert_eq!(armory.current().ammo(), 12);
        assert_eq!(armory.current().last_fire(), None);
    }

    #[test]
    fn reload_blocks_fire_then_refills() {
        let mut armory = rifle_armory();
        for i in 0..5 {
            armory.fire(ms(100 * i), EYE, Vec3::NEG_Z);
        }
        assert_eq!(armory.current().ammo(), 25);

        let start = ms(1000);
        assert!(armory.reload(start));
        assert!(!armory.reload(start + ms(100)));
        assert!(armory.fire(start + ms(500), EYE, Vec3::NEG_Z).is_none());
        assert_eq!(armory.current().ammo(), 25);
        assert_eq!(armory.update(start + ms(899), 0.016), None);
        assert!(armory.is_reloading());
        assert_eq!(armory.update(start + ms(900), 0.016), Some(WeaponKind::Rifle));
        assert_eq!(armory.current().ammo(), 30);
        assert!(!armory.is_reloading());
    }

    #[test]
    fn reload_from_empty_refills_exactly() {
        let mut armory = rifle_armory();
        for i in 0..30 {
            armory.fire(ms(100 * i), EYE, Vec3::NEG_Z);
        }
        assert!(armory.current().is_empty());
        assert!(armory.reload(ms(3000)));
        assert!(armory.fire(ms(3500), EYE, Vec3::NEG_Z).is_none());
        // A fire attempt after the deadline settles the reload first.
        assert!(armory.fire(ms(3900), EYE, Vec3::NEG_Z).is_some());
        assert_eq!(armory.current().ammo(), 29);
    }

    #[test]
    fn reload_fraction_tracks_game_time() {
        let mut armory = rifle_armory();
        assert_eq!(armory.reload_fraction(ms(0)), None);
        armory.reload(ms(0));
        let half = armory.reload_fraction(ms(450)).unwrap();
        assert!((half - 0.5).abs() < 1e-6);
    }

    #[test]
    fn switch_to_empty_weapon_is_rejected() {
        let mut armory = rifle_armory();
        for i in 0..30 {
            armory.fire(ms(100 * i), EYE, Vec3::NEG_Z);
        }
        assert!(armory.switch_weapon(WeaponKind::Pistol));
        assert!(!armory.switch_weapon(WeaponKind::Rifle));
        assert_eq!(armory.current_kind(), WeaponKind::Pistol);
        assert!(!armory.switch_weapon(WeaponKind::Pistol));
    }

    #[test]
    fn switch_keeps_per_weapon_cooldown() {
        let mut armory = rifle_armory();
        assert!(armory.fire(ms(0), EYE, Vec3::NEG_Z).is_some());
        assert!(armory.switch_weapon(WeaponKind::Pistol));
        assert!(armory.fire(ms(10), EYE, Vec3::NEG_Z).is_some());
        assert!(armory.switch_weapon(WeaponKind::Rifle));
        assert!(armory.fire(ms(50), EYE, Vec3::NEG_Z).is_none());
        assert!(armory.fire(ms(100), EYE, Vec3::NEG_Z).is_some());
        assert!(armory.weapon(WeaponKind::Pistol).recoil() > 0.0);
    }

    #[test]
    fn switching_away_cancels_pending_reload() {
        let mut armory = rifle_armory();
        armory.fire(ms(0), EYE, Vec3::NEG_Z);
        assert!(armory.reload(ms(100)));
        assert!(armory.switch_weapon(WeaponKind::Pistol));
        assert!(!armory.is_reloading());
        assert!(armory.switch_weapon(WeaponKind::Rifle));
        assert_eq!(armory.update(ms(5000), 0.016), None);
        assert_eq!(armory.weapon(WeaponKind::Rifle).ammo(), 29);
    }

    #[test]
    fn recoil_recovery_is_frame_rate_independent() {
        let mut fast = rifle_armory();
        let mut slow = rifle_armory();
        fast.fire(ms(0), EYE, Vec3::NEG_Z);
        slow.fire(ms(0), EYE, Vec3::NEG_Z);
        for i in 1..=8 {
            fast.update(ms(i * 5), 0.005);
        }
        for i in 1..=2 {
            slow.update(ms(i * 20), 0.02);
        }
        let (a, b) = (fast.current().recoil(), slow.current().recoil());
        assert!(a > 0.0);
        assert!((a - b).abs() < 1e-5);
    }

    #[test]
    fn recoil_settles_to_zero() {
        let mut armory = rifle_armory();
        armory.fire(ms(0), EYE, Vec3::NEG_Z);
        armory.update(ms(1000), 1.0);
        assert_eq!(armory.current().recoil(), 0.0);
        assert_eq!(armory.current().viewmodel_offset(), VIEWMODEL_REST);
    }

    #[test]
    fn viewmodel_dips_during_reload() {
        let mut armory = rifle_armory();
        armory.reload(ms(0));
        armory.update(ms(30), 0.03);
        let offset = armory.current().viewmodel_offset();
        assert!(offset.y < VIEWMODEL_REST.y);
    }

    #[test]
    fn weapon_slots_map_to_kinds() {
        assert_eq!(WeaponKind::from_slot(0), Some(WeaponKind::Pistol));
        assert_eq!(WeaponKind::from_slot(1), Some(WeaponKind::Rifle));
        assert_eq!(WeaponKind::from_slot(2), None);
    }
}
