use crate::location::GridCoord;
use crate::occupant::{Node, NodeId, Segment, SegmentId};
use crate::shape::Direction;

/// A grid slot produced by an index build. Holds at most one segment and at most one node.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Cell {
    /// Where the cell is.
    pub coord: GridCoord,
    /// The segment on this cell, if any.
    pub segment: Option<SegmentId>,
    /// The node on this cell, if any.
    pub node: Option<NodeId>,
}

impl Cell {
    pub(crate) fn empty(coord: GridCoord) -> Self {
        Self { coord, segment: None, node: None }
    }

    /// Neither a segment nor a node.
    pub fn is_empty(&self) -> bool {
        self.segment.is_none() && self.node.is_none()
    }
}

/// The occupants a [`Cell`] refers to, resolved against their owning slices.
#[derive(Clone, Copy, Debug)]
pub struct Occupants<'a> {
    /// The segment on the cell, if its id resolved.
    pub segment: Option<&'a Segment>,
    /// The node on the cell, if its id resolved.
    pub node: Option<&'a Node>,
}

impl<'a> Occupants<'a> {
    pub(crate) fn resolve(cell: &Cell, segments: &'a [Segment], nodes: &'a [Node]) -> Self {
        Self {
            segment: cell.segment.and_then(|SegmentId(i)| segments.get(i)),
            node: cell.node.and_then(|NodeId(i)| nodes.get(i)),
        }
    }

    /// Effective connections: the segment wins over the node, and an empty cell connects nowhere.
    pub fn connections(&self) -> Vec<Direction> {
        match (self.segment, self.node) {
            (Some(segment), _) => segment.current_connections(),
            (None, Some(node)) => node.connections.clone(),
            (None, None) => Vec::new(),
        }
    }

    /// Whether a target-flagged node sits here.
    pub fn is_target(&self) -> bool {
        self.node.is_some_and(Node::is_target)
    }
}
