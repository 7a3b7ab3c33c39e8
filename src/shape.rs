use strum::{Display, VariantArray};

use crate::location::GridCoord;

/// A compass direction on the grid.
///
/// The declaration order is the canonical clockwise index used by [`rotate`](Direction::rotate): North is 0, West is 3.
#[derive(Copy, Clone, VariantArray, Display, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum Direction {
    /// `+z`
    North,
    /// `+x`
    East,
    /// `-z`
    South,
    /// `-x`
    West,
}

impl Direction {
    /// Position of `self` in the clockwise cycle.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Advance `self` clockwise by `steps` quarter turns.
    pub fn rotate(&self, steps: u8) -> Self {
        Self::VARIANTS[(self.index() + steps as usize) % Self::VARIANTS.len()]
    }

    /// The direction pointing back, North against South and East against West.
    pub fn opposite(&self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Unit grid offset `(dx, dz)`.
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::East => (1, 0),
            Self::South => (0, -1),
            Self::West => (-1, 0),
        }
    }

    /// Take one step from `coord` in this direction. `None` at the edge of the grid.
    pub fn attempt_from(&self, coord: GridCoord) -> Option<GridCoord> {
        coord.offset_by(self.offset())
    }

    /// Determine the direction from `a` to `b`, if they are orthogonally adjacent.
    pub fn between(a: GridCoord, b: GridCoord) -> Option<Self> {
        Self::VARIANTS.iter().find(|dir| dir.attempt_from(a) == Some(b)).copied()
    }
}
