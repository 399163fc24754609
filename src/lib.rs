//! Mine Drop - lane-dodging game for a 5x7 LED matrix
//!
//! Core modules:
//! - `sim`: Deterministic simulation (field, difficulty, collision, state machine)
//! - `link`: Single-byte peer protocol over a lossy point-to-point link
//! - `render`: Render commands and a reference LED matrix rasterizer
//! - `settings`: Tunable timing constants

pub mod link;
pub mod render;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

use glam::IVec2;

/// Game configuration constants
pub mod consts {
    /// Field columns: 4 playable lanes plus the sentinel column
    pub const FIELD_WIDTH: usize = 5;
    /// Field rows, including the off-matrix staging row at the top
    pub const FIELD_HEIGHT: usize = 8;
    /// Number of lane-gap slots a mine can be anchored to
    pub const LANE_GAPS: usize = FIELD_WIDTH - 1;

    /// Rightmost lane the 2-wide player token can occupy
    pub const MAX_LANE: u8 = 3;
    /// Lane the player starts each round in
    pub const START_LANE: u8 = 2;
    /// Field rows covered by the player token
    pub const PLAYER_ROWS: [usize; 2] = [0, 1];

    /// Tracker row a freshly spawned mine starts at
    pub const SPAWN_ROW: u8 = (FIELD_HEIGHT - 1) as u8;
    /// A descending mine below this tracker row crushes an overlapping player
    pub const HAZARD_ROW: u8 = 3;
    /// No spawns while any mine is still above this tracker row
    pub const CROWDING_ROW: u8 = (FIELD_HEIGHT - 5) as u8;

    /// LED matrix dimensions
    pub const MATRIX_WIDTH: i32 = 5;
    pub const MATRIX_HEIGHT: i32 = 7;
}

/// Convert a field cell (column, row counted from the bottom) to matrix coordinates.
///
/// Rows above the matrix map to negative y and are clipped by the display.
#[inline]
pub fn field_to_matrix(column: usize, row: usize) -> IVec2 {
    IVec2::new(column as i32, consts::MATRIX_HEIGHT - 1 - row as i32)
}
