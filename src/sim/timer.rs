//! Millisecond countdown timers
//!
//! Every cooperative timer in the game (combo window, power-ups, coyote time,
//! jump buffer) is a `Countdown` ticked once per frame.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    remaining_ms: f32,
    duration_ms: f32,
}

impl Countdown {
    /// An already-expired timer
    pub const IDLE: Self = Self {
        remaining_ms: 0.0,
        duration_ms: 0.0,
    };

    /// Start (or restart) the countdown at its full duration
    pub fn arm(&mut self, duration_ms: f32) {
        let duration_ms = duration_ms.max(0.0);
        self.remaining_ms = duration_ms;
        self.duration_ms = duration_ms;
    }

    /// Count down by `dt_ms`. Returns true on the tick the timer runs out.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        if self.remaining_ms <= 0.0 {
            return false;
        }
        self.remaining_ms = (self.remaining_ms - dt_ms.max(0.0)).max(0.0);
        self.remaining_ms == 0.0
    }

    pub fn clear(&mut self) {
        self.remaining_ms = 0.0;
    }

    pub fn active(&self) -> bool {
        self.remaining_ms > 0.0
    }

    pub fn expired(&self) -> bool {
        !self.active()
    }

    pub fn remaining_ms(&self) -> f32 {
        self.remaining_ms
    }

    /// Remaining share of the armed duration, 0..=1 (for HUD bars)
    pub fn fraction(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            0.0
        } else {
            (self.remaining_ms / self.duration_ms).clamp(0.0, 1.0)
        }
    }
}
