//! Game time for the simulation loop.
//!
//! Game time is kept as a [`Duration`] so cooldown and lifetime comparisons
//! are exact integer arithmetic rather than accumulated float sums.

use std::time::Duration;

/// Fastest accepted fixed update rate.
pub const MAX_FIXED_RATE_HZ: f64 = 1000.0;

/// Manages frame timing, game time, and the fixed-step accumulator.
#[derive(Debug)]
pub struct Time {
    /// Duration of the last tick.
    delta: Duration,
    /// Total game time since the session started.
    elapsed: Duration,
    /// Tick count since start.
    frame_count: u64,
    /// Fixed timestep for enemy motion (default 60 Hz).
    fixed_timestep: Duration,
    /// Accumulated time for fixed updates.
    accumulator: Duration,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new clock at game time zero.
    pub fn new() -> Self {
        Self {
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
            fixed_timestep: Duration::from_secs_f64(1.0 / 60.0),
            accumulator: Duration::ZERO,
        }
    }

    /// Advance game time by an explicit frame delta.
    pub fn advance(&mut self, dt: Duration) {
        self.delta = dt;
        self.elapsed += dt;
        self.frame_count += 1;
        self.accumulator += dt;
    }

    /// Current game time.
    pub fn now(&self) -> Duration {
        self.elapsed
    }

    /// Get the delta time as a Duration.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Get the current tick count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the fixed timestep in seconds.
    pub fn fixed_timestep_seconds(&self) -> f32 {
        self.fixed_timestep.as_secs_f32()
    }

    /// Check if a fixed update should run and consume the time.
    pub fn should_fixed_update(&mut self) -> bool {
        if self.accumulator >= self.fixed_timestep {
            self.accumulator -= self.fixed_timestep;
            true
        } else {
            false
        }
    }

    /// Set the fixed timestep rate in Hz. Rates outside `(0, MAX_FIXED_RATE_HZ]` are ignored.
    pub fn set_fixed_rate(&mut self, hz: f64) {
        if hz > 0.0 && hz <= MAX_FIXED_RATE_HZ {
            self.fixed_timestep = Duration::from_secs_f64(1.0 / hz);
        } else {
            log::warn!("Ignoring invalid fixed update rate {} Hz", hz);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates_exact_game_time() {
        let mut time = Time::new();
        for _ in 0..10 {
            time.advance(Duration::from_millis(100));
        }
        assert_eq!(time.now(), Duration::from_secs(1));
        assert_eq!(time.frame_count(), 10);
        assert_eq!(time.delta(), Duration::from_millis(100));
    }

    #[test]
    fn fixed_update_consumes_whole_steps_only() {
        let mut time = Time::new();
        time.set_fixed_rate(10.0);
        time.advance(Duration::from_millis(250));
        let mut steps = 0;
        while time.should_fixed_update() {
            steps += 1;
        }
        assert_eq!(steps, 2);
        // The 50ms remainder carries into the next frame.
        time.advance(Duration::from_millis(50));
        assert!(time.should_fixed_update());
        assert!(!time.should_fixed_update());
    }

    #[test]
    fn invalid_fixed_rate_is_ignored() {
        let mut time = Time::new();
        let before = time.fixed_timestep_seconds();
        time.set_fixed_rate(0.0);
        time.set_fixed_rate(f64::NAN);
        time.set_fixed_rate(-60.0);
        time.set_fixed_rate(1e12);
        assert_eq!(time.fixed_timestep_seconds(), before);
    }
}
