//! Player movement and collision
//!
//! A candidate lane either fits, hits the field edge (blocked, harmless) or
//! runs into a mine (blocked, fatal). The result is returned to the caller;
//! nothing here flips the alive flag behind its back.

use serde::{Deserialize, Serialize};

use super::field::{Field, LaneGap, LaneGapError};
use crate::consts::*;

/// Outcome of testing a candidate player lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collision {
    Clear,
    /// Outside the playable lanes
    Boundary,
    /// Player token would overlap a mine
    Obstacle,
}

impl Collision {
    pub fn blocks(self) -> bool {
        self != Collision::Clear
    }

    pub fn is_fatal(self) -> bool {
        self == Collision::Obstacle
    }
}

/// Test whether the player token fits in `lane`
pub fn check_lane(field: &Field, lane: i16) -> Collision {
    if !(0..=MAX_LANE as i16).contains(&lane) {
        return Collision::Boundary;
    }
    let lane = lane as usize;
    let hit = [lane, lane + 1]
        .into_iter()
        .any(|column| PLAYER_ROWS.iter().any(|&row| field.is_occupied(column, row)));
    if hit {
        Collision::Obstacle
    } else {
        Collision::Clear
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    #[inline]
    pub fn delta(self) -> i16 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// The 2-wide player token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PlayerSnapshot")]
pub struct Player {
    lane: u8,
    alive: bool,
}

#[derive(Deserialize)]
struct PlayerSnapshot {
    lane: u8,
    alive: bool,
}

impl TryFrom<PlayerSnapshot> for Player {
    type Error = LaneGapError;

    // a lane is playable exactly when its own gap exists
    fn try_from(snapshot: PlayerSnapshot) -> Result<Self, Self::Error> {
        let gap = LaneGap::new(snapshot.lane)?;
        Ok(Self {
            lane: gap.index(),
            alive: snapshot.alive,
        })
    }
}

impl Default for Player {
    fn default() -> Self {
        Self {
            lane: START_LANE,
            alive: true,
        }
    }
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    /// Player placed in a specific lane (clamped to the playable range)
    pub fn in_lane(lane: u8) -> Self {
        Self {
            lane: lane.min(MAX_LANE),
            alive: true,
        }
    }

    #[inline]
    pub fn lane(&self) -> u8 {
        self.lane
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// The lane-gap anchored at the player's left column
    pub fn own_gap(&self) -> LaneGap {
        LaneGap::ALL[self.lane as usize]
    }

    /// Shift one lane if the destination is clear.
    ///
    /// The lane only changes on `Collision::Clear`.
    pub fn try_move(&mut self, direction: Direction, field: &Field) -> Collision {
        let target = self.lane as i16 + direction.delta();
        let collision = check_lane(field, target);
        if collision == Collision::Clear {
            self.lane = target as u8;
        }
        collision
    }

    /// Mark the player dead. Returns true only for the call that killed them.
    pub fn kill(&mut self) -> bool {
        std::mem::replace(&mut self.alive, false)
    }
}
