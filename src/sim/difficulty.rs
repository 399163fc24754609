//! Spawn-interval ramp
//!
//! The counter starts at the tick rate and drops by one per descent pass
//! until it reaches its floor. It only goes back up on round reset.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    start: u32,
    floor: u32,
    base_speed: u32,
    counter: u32,
    /// Ticks since the last descent pass
    elapsed: u32,
}

impl Difficulty {
    pub fn new(settings: &Settings) -> Self {
        Self::from_parts(
            settings.difficulty_start(),
            settings.difficulty_floor_divisor,
            settings.base_speed,
        )
    }

    pub fn from_parts(start: u32, floor_divisor: u32, base_speed: u32) -> Self {
        Self {
            start,
            floor: start / floor_divisor.max(1),
            base_speed: base_speed.max(1),
            counter: start,
            elapsed: 0,
        }
    }

    #[inline]
    pub fn counter(&self) -> u32 {
        self.counter
    }

    #[inline]
    pub fn floor(&self) -> u32 {
        self.floor
    }

    #[inline]
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Ticks between descent passes at the current difficulty
    pub fn spawn_interval(&self) -> u32 {
        (self.counter / self.base_speed.max(1)).max(1)
    }

    /// Count one tick. Returns true when a descent pass is due.
    pub fn advance(&mut self) -> bool {
        self.elapsed += 1;
        if self.elapsed >= self.spawn_interval() {
            self.elapsed = 0;
            true
        } else {
            false
        }
    }

    /// Tighten the interval after a descent pass
    pub fn ramp(&mut self) {
        if self.counter > self.floor {
            self.counter -= 1;
        }
    }

    pub fn reset(&mut self) {
        self.counter = self.start;
        self.elapsed = 0;
    }
}
