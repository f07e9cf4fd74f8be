//! Common components shared by simulation systems.

use std::time::Duration;

use glam::Vec3;

/// World position of a transient entity (effects, decals).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectPosition(pub Vec3);

/// Lifetime component for temporary entities, keyed by game time.
///
/// The birth timestamp is fixed at creation; age is always derived from the
/// current game time, so expiry does not depend on how often it is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifetime {
    born: Duration,
    duration: Duration,
}

impl Lifetime {
    pub fn new(born: Duration, duration: Duration) -> Self {
        Self { born, duration }
    }

    pub fn born(&self) -> Duration {
        self.born
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Age at `now`. Zero if `now` precedes the birth time.
    pub fn age(&self, now: Duration) -> Duration {
        now.saturating_sub(self.born)
    }

    /// True once the age strictly exceeds the lifetime.
    pub fn is_expired(&self, now: Duration) -> bool {
        self.age(now) > self.duration
    }
}

/// Exponential decay of `value` toward zero, parameterised per second.
///
/// `rate_per_second` is the continuous decay rate, so two half-frames decay
/// exactly as much as one full frame. Results below `snap` collapse to zero.
pub fn decay_toward_zero(value: f32, rate_per_second: f32, dt: f32, snap: f32) -> f32 {
    if value == 0.0 {
        return 0.0;
    }
    let decayed = value * (-rate_per_second * dt.max(0.0)).exp();
    if decayed.abs() < snap {
        0.0
    } else {
        decayed
    }
}

/// Convert a per-frame multiplicative factor at `frame_hz` into a per-second rate.
pub fn per_frame_factor_to_rate(factor: f32, frame_hz: f32) -> f32 {
    -factor.ln() * frame_hz
}
