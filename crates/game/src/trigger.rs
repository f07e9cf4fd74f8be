//! Held-trigger repeat fire.
//!
//! Holding fire re-attempts a shot once per cooldown of the weapon held at
//! the moment of each attempt. The trigger is plain time-stamped state polled
//! once per tick; there is no background timer to leak or double-start.

use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FireTrigger {
    held: bool,
    next_due: Duration,
}

impl FireTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Start repeat fire with an immediate attempt. No-op if already held.
    pub fn press(&mut self, now: Duration) -> bool {
        if self.held {
            return false;
        }
        self.held = true;
        self.next_due = now;
        true
    }

    /// Stop repeat fire. No-op if not held.
    pub fn release(&mut self) -> bool {
        std::mem::replace(&mut self.held, false)
    }

    /// Re-arm a held trigger so the next poll attempts immediately.
    /// Used when the held weapon changes or becomes ready again.
    pub fn restart(&mut self, now: Duration) {
        if self.held {
            self.next_due = now;
        }
    }

    /// Hold off the next attempt until `at`, e.g. when the held weapon is
    /// still cooling down from a shot fired before a switch.
    pub fn defer_until(&mut self, at: Duration) {
        if self.held {
            self.next_due = at;
        }
    }

    /// Returns the scheduled time of the attempt due at `now`, if any.
    ///
    /// The following attempt is scheduled one `cooldown` after this one's
    /// due time, not after `now`, so frame lateness never accumulates.
    /// A frame longer than the cooldown yields one attempt, never a burst.
    pub fn poll(&mut self, now: Duration, cooldown: Duration) -> Option<Duration> {
        if !self.held || now < self.next_due {
            return None;
        }
        let due = self.next_due;
        self.next_due = (due + cooldown).max(now);
        Some(due)
    }
}
