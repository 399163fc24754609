//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One call to `tick` per fixed timestep
//! - Seeded RNG only (autopilot)
//! - Stable iteration order (by lane-gap index)
//! - No display or transport dependencies beyond the `Link` trait

pub mod autopilot;
pub mod collision;
pub mod difficulty;
pub mod field;
pub mod state;
pub mod tick;

pub use autopilot::Autopilot;
pub use collision::{Collision, Direction, Player, check_lane};
pub use difficulty::Difficulty;
pub use field::{Field, LaneGap, LaneGapError, MineSlot};
pub use state::{DeathCause, GameEvent, GameState, Phase};
pub use tick::{TickInput, tick};
