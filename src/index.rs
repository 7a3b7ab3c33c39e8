use std::collections::BTreeMap;

use crate::cell::{Cell, Occupants};
use crate::location::GridCoord;
use crate::occupant::{Node, NodeId, Segment, SegmentId};
use crate::shape::Direction;

/// A snapshot mapping grid coordinates to [`Cell`]s, borrowing the occupants it was built from.
///
/// Indexes are never updated in place; build a new one whenever occupants move or are replaced.
#[derive(Clone, Debug)]
pub struct GridIndex<'a> {
    cells: BTreeMap<GridCoord, Cell>,
    segments: &'a [Segment],
    nodes: &'a [Node],
    cell_size: f32,
}

/// Index every occupant by its snapped position.
///
/// Segments are placed first, then nodes. Two occupants of the same kind on one coordinate overwrite one another, the later winning.
pub fn build_index<'a>(segments: &'a [Segment], nodes: &'a [Node], cell_size: f32) -> GridIndex<'a> {
    let mut cells = BTreeMap::new();

    for (i, segment) in segments.iter().enumerate() {
        let coord = GridCoord::from_world(segment.position, cell_size);
        cells.entry(coord).or_insert_with(|| Cell::empty(coord)).segment = Some(SegmentId(i));
    }

    for (i, node) in nodes.iter().enumerate() {
        let coord = GridCoord::from_world(node.position, cell_size);
        cells.entry(coord).or_insert_with(|| Cell::empty(coord)).node = Some(NodeId(i));
    }

    GridIndex { cells, segments, nodes, cell_size }
}

impl<'a> GridIndex<'a> {
    /// The cell at `coord`, if anything was indexed there.
    pub fn get(&self, coord: GridCoord) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cells in coordinate order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    /// Grid spacing the index was built with.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// The segments the index borrows.
    pub fn segments(&self) -> &'a [Segment] {
        self.segments
    }

    /// The nodes the index borrows.
    pub fn nodes(&self) -> &'a [Node] {
        self.nodes
    }

    /// Resolve `cell`'s ids against the borrowed occupants.
    pub fn occupants(&self, cell: &Cell) -> Occupants<'a> {
        Occupants::resolve(cell, self.segments, self.nodes)
    }

    /// Current connections of `cell`, see [`Occupants::connections`].
    pub fn connections_of(&self, cell: &Cell) -> Vec<Direction> {
        self.occupants(cell).connections()
    }

    /// Where `node` lands on this grid.
    pub fn coord_of_node(&self, node: NodeId) -> Option<GridCoord> {
        self.nodes.get(node.0).map(|n| GridCoord::from_world(n.position, self.cell_size))
    }

    /// The `(min, max)` corners of the indexed area, or `None` for an empty index.
    pub fn bounds(&self) -> Option<(GridCoord, GridCoord)> {
        let mut coords = self.cells.keys();
        let first = *coords.next()?;
        Some(coords.fold((first, first), |(lo, hi), c| {
            (GridCoord(lo.0.min(c.0), lo.1.min(c.1)), GridCoord(hi.0.max(c.0), hi.1.max(c.1)))
        }))
    }
}
