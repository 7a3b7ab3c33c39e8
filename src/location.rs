use std::fmt::{Display, Formatter};

type Coord = i32;

/// A continuous position in the host's world space. `y` is vertical and never affects indexing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldPos {
    /// East-west component.
    pub x: f32,
    /// Height; ignored by the grid.
    pub y: f32,
    /// North-south component.
    pub z: f32,
}

impl WorldPos {
    /// A position from all three components.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// A position on the ground plane, `y = 0`.
    pub fn flat(x: f32, z: f32) -> Self {
        Self { x, y: 0.0, z }
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// A cell on the logical grid, `(x, z)`. North is `+z`, east is `+x`.
#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug, Default)]
pub struct GridCoord(pub Coord, pub Coord);

impl GridCoord {
    /// Snap a world position to the grid by dividing the horizontal components by `cell_size`.
    ///
    /// Halfway values round to the nearest even integer, so `0.5` and `-0.5` both land on `0`.
    /// Positions beyond the grid's range saturate at its edge; use [`try_from_world`](Self::try_from_world) to reject them.
    pub fn from_world(pos: WorldPos, cell_size: f32) -> Self {
        Self(
            (pos.x / cell_size).round_ties_even() as Coord,
            (pos.z / cell_size).round_ties_even() as Coord,
        )
    }

    /// Like [`from_world`](Self::from_world), but `None` if either snapped component falls outside the grid.
    pub fn try_from_world(pos: WorldPos, cell_size: f32) -> Option<Self> {
        let range = Coord::MIN as f32..Coord::MAX as f32;
        let x = (pos.x / cell_size).round_ties_even();
        let z = (pos.z / cell_size).round_ties_even();
        (range.contains(&x) && range.contains(&z)).then(|| Self(x as Coord, z as Coord))
    }

    /// Shift by `rhs`, or `None` if that would leave the grid.
    pub fn offset_by(self, rhs: (Coord, Coord)) -> Option<Self> {
        Some(Self(self.0.checked_add(rhs.0)?, self.1.checked_add(rhs.1)?))
    }
}

impl From<(Coord, Coord)> for GridCoord {
    fn from(value: (Coord, Coord)) -> Self {
        Self(value.0, value.1)
    }
}

impl Display for GridCoord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}
