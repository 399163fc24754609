//! Lane grid and mine descent
//!
//! The field is a 5x8 occupancy grid. Every mine is a 2x2 block anchored to a
//! lane-gap: columns `gap` and `gap + 1`, tracker row and the row beneath it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected lane-gap index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("lane-gap index {0} out of range (0..{max})", max = LANE_GAPS)]
pub struct LaneGapError(pub u8);

/// Snapshot that does not describe a reachable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("mine row {0} is above the spawn row {max}", max = SPAWN_ROW)]
    RowOutOfRange(u8),

    #[error("mine in {0:?} overlaps a neighbouring mine")]
    Overlap(LaneGap),
}

/// Anchor column for a 2-wide mine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LaneGap(u8);

impl LaneGap {
    pub const ALL: [LaneGap; LANE_GAPS] = [LaneGap(0), LaneGap(1), LaneGap(2), LaneGap(3)];

    pub fn new(index: u8) -> Result<Self, LaneGapError> {
        if (index as usize) < LANE_GAPS {
            Ok(Self(index))
        } else {
            Err(LaneGapError(index))
        }
    }

    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }

    /// The two field columns covered by a mine in this gap
    #[inline]
    pub fn columns(self) -> [usize; 2] {
        let left = self.0 as usize;
        [left, left + 1]
    }

    /// Whether a mine here shares a column with a player in `lane`
    pub fn overlaps_lane(self, lane: u8) -> bool {
        self.0.abs_diff(lane) <= 1
    }
}

impl TryFrom<u8> for LaneGap {
    type Error = LaneGapError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

impl From<LaneGap> for u8 {
    fn from(gap: LaneGap) -> u8 {
        gap.0
    }
}

/// Descent tracker for a single lane-gap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawMineSlot")]
pub enum MineSlot {
    #[default]
    Empty,
    /// Mine covering `row` and the row beneath it
    Active { row: u8 },
}

impl MineSlot {
    pub fn row(self) -> Option<u8> {
        match self {
            MineSlot::Empty => None,
            MineSlot::Active { row } => Some(row),
        }
    }

    pub fn is_empty(self) -> bool {
        self == MineSlot::Empty
    }

    /// Field rows covered by a mine whose tracker sits at `row`
    fn rows(row: u8) -> impl Iterator<Item = usize> {
        let row = row as usize;
        (row.saturating_sub(1)..=row).rev()
    }
}

#[derive(Deserialize)]
enum RawMineSlot {
    Empty,
    Active { row: u8 },
}

impl TryFrom<RawMineSlot> for MineSlot {
    type Error = FieldError;

    fn try_from(raw: RawMineSlot) -> Result<Self, Self::Error> {
        match raw {
            RawMineSlot::Empty => Ok(MineSlot::Empty),
            RawMineSlot::Active { row } if row <= SPAWN_ROW => Ok(MineSlot::Active { row }),
            RawMineSlot::Active { row } => Err(FieldError::RowOutOfRange(row)),
        }
    }
}

/// Occupancy grid plus one descent tracker per lane-gap.
///
/// Serialized as the trackers alone; the grid is rebuilt on load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "FieldSnapshot", into = "FieldSnapshot")]
pub struct Field {
    /// `cells[column][row]`, row 0 at the bottom
    cells: [[bool; FIELD_HEIGHT]; FIELD_WIDTH],
    mines: [MineSlot; LANE_GAPS],
}

impl Field {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty every cell and tracker
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn is_occupied(&self, column: usize, row: usize) -> bool {
        self.cells
            .get(column)
            .and_then(|col| col.get(row))
            .copied()
            .unwrap_or(false)
    }

    pub fn slot(&self, gap: LaneGap) -> MineSlot {
        self.mines[gap.0 as usize]
    }

    /// Active mines in gap order
    pub fn mines(&self) -> impl Iterator<Item = (LaneGap, u8)> + '_ {
        LaneGap::ALL
            .into_iter()
            .filter_map(|gap| self.slot(gap).row().map(|row| (gap, row)))
    }

    pub fn active_count(&self) -> usize {
        self.mines.iter().filter(|slot| !slot.is_empty()).count()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&cell| cell).count()
    }

    pub fn is_clear(&self) -> bool {
        self.active_count() == 0 && self.occupied_count() == 0
    }

    /// True while any mine is still high enough that another one would stack on it
    pub fn is_crowded(&self) -> bool {
        self.mines().any(|(_, row)| row > CROWDING_ROW)
    }

    /// Whether `gap` is empty and its spawn block is free of other mines
    pub fn can_spawn(&self, gap: LaneGap) -> bool {
        self.slot(gap).is_empty() && !self.touches(gap, SPAWN_ROW)
    }

    /// Place a new mine at the top of `gap`.
    ///
    /// Refused when the gap already has a mine or the spawn block would touch
    /// a neighbouring mine. Returns whether the mine was placed.
    pub fn spawn(&mut self, gap: LaneGap) -> bool {
        if !self.can_spawn(gap) {
            return false;
        }
        self.mines[gap.0 as usize] = MineSlot::Active { row: SPAWN_ROW };
        self.mark(gap, SPAWN_ROW, true);
        true
    }

    /// Move every active mine down one row.
    ///
    /// Returns the gaps whose mine left the field on this pass.
    pub fn descend(&mut self) -> Vec<LaneGap> {
        let active: Vec<(LaneGap, u8)> = self.mines().collect();
        // clear everything first so neighbours sharing a column never erase each other
        for &(gap, row) in &active {
            self.mark(gap, row, false);
        }

        let mut exited = Vec::new();
        for (gap, row) in active {
            match row.checked_sub(1) {
                Some(next) => {
                    self.mines[gap.0 as usize] = MineSlot::Active { row: next };
                    self.mark(gap, next, true);
                }
                None => {
                    self.mines[gap.0 as usize] = MineSlot::Empty;
                    exited.push(gap);
                }
            }
        }
        exited
    }

    /// First low mine overlapping a player in `lane`, if any
    pub fn crushing(&self, lane: u8) -> Option<LaneGap> {
        self.mines()
            .find(|&(gap, row)| row < HAZARD_ROW && gap.overlaps_lane(lane))
            .map(|(gap, _)| gap)
    }

    fn mark(&mut self, gap: LaneGap, row: u8, occupied: bool) {
        for column in gap.columns() {
            for r in MineSlot::rows(row) {
                self.cells[column][r] = occupied;
            }
        }
    }

    fn touches(&self, gap: LaneGap, row: u8) -> bool {
        gap.columns()
            .into_iter()
            .any(|column| MineSlot::rows(row).any(|r| self.cells[column][r]))
    }
}

#[derive(Serialize, Deserialize)]
struct FieldSnapshot {
    mines: [MineSlot; LANE_GAPS],
}

impl From<Field> for FieldSnapshot {
    fn from(field: Field) -> Self {
        Self { mines: field.mines }
    }
}

impl TryFrom<FieldSnapshot> for Field {
    type Error = FieldError;

    fn try_from(snapshot: FieldSnapshot) -> Result<Self, Self::Error> {
        let mut field = Field::new();
        for gap in LaneGap::ALL {
            let Some(row) = snapshot.mines[gap.0 as usize].row() else {
                continue;
            };
            if field.touches(gap, row) {
                return Err(FieldError::Overlap(gap));
            }
            field.mines[gap.0 as usize] = MineSlot::Active { row };
            field.mark(gap, row, true);
        }
        Ok(field)
    }
}
