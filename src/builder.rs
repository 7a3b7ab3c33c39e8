use itertools::Itertools;
use thiserror::Error;

use crate::board::FlowNetwork;
use crate::location::{GridCoord, WorldPos};
use crate::occupant::{Node, NodeRole, Segment};
use crate::shape::Direction;

/// Distance between neighboring cell centers unless configured otherwise.
pub const DEFAULT_CELL_SIZE: f32 = 1.5;

/// Reasons a builder may become invalid while building.
#[derive(Copy, Clone, Debug, Error, PartialEq)]
pub enum BuilderInvalidReason {
    /// The cell size was zero, negative, NaN or infinite.
    #[error("cell size must be finite and positive, got {0}")]
    BadCellSize(f32),
    /// An occupant was placed at a position with a NaN or infinite component.
    #[error("occupant position {0:?} is not finite")]
    BadPosition(WorldPos),
    /// An occupant's position snaps to a cell beyond the range of [`GridCoord`] at the configured cell size.
    #[error("occupant position {0:?} lies outside the grid")]
    OutOfGrid(WorldPos),
}

/// Collects the occupants and settings of one puzzle, then turns them into a [`FlowNetwork`].
///
/// Segments and nodes receive [`SegmentId`](crate::occupant::SegmentId)s and [`NodeId`](crate::occupant::NodeId)s
/// in the order they are added, starting at 0.
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
#[derive(Clone, Debug)]
pub struct NetworkBuilder {
    cell_size: f32,
    segments: Vec<Segment>,
    nodes: Vec<Node>,
    lock_on_complete: bool,
    invalid_reasons: Vec<BuilderInvalidReason>,
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkBuilder {
    /// An empty builder with the default cell size and no locking.
    pub fn new() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            segments: Vec::new(),
            nodes: Vec::new(),
            lock_on_complete: false,
            invalid_reasons: Vec::new(),
        }
    }

    /// Set the grid spacing used to snap world positions to cells.
    ///
    /// May cause the builder to enter a [`BadCellSize`](BuilderInvalidReason::BadCellSize) invalid state, or an
    /// [`OutOfGrid`](BuilderInvalidReason::OutOfGrid) one if an occupant added earlier no longer fits the grid.
    pub fn cell_size(&mut self, cell_size: f32) -> &mut Self {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            self.invalid_reasons.push(BuilderInvalidReason::BadCellSize(cell_size));
            return self;
        }
        self.cell_size = cell_size;

        let positions = self.segments.iter().map(Segment::position)
            .chain(self.nodes.iter().map(Node::position))
            .collect_vec();
        for position in positions {
            self.check_position(position);
        }
        self
    }

    /// Stop accepting segment actuation once the flow has completed.
    pub fn lock_on_complete(&mut self, lock: bool) -> &mut Self {
        self.lock_on_complete = lock;
        self
    }

    /// Add a segment at rotation 0 whose connections at that rotation are `base`.
    pub fn add_segment(&mut self, position: WorldPos, base: Vec<Direction>) -> &mut Self {
        self.add_segment_rotated(position, base, 0)
    }

    /// Add a segment already turned `steps` quarters clockwise. `steps` wraps at 4.
    pub fn add_segment_rotated(&mut self, position: WorldPos, base: Vec<Direction>, steps: u8) -> &mut Self {
        if self.check_position(position) {
            self.segments.push(Segment::with_rotation(position, base, steps));
        }
        self
    }

    /// Add a fixed node with the given connections and flow role.
    pub fn add_node(&mut self, position: WorldPos, connections: Vec<Direction>, role: NodeRole) -> &mut Self {
        if self.check_position(position) {
            self.nodes.push(Node::new(position, connections, role));
        }
        self
    }

    fn check_position(&mut self, position: WorldPos) -> bool {
        if !position.is_finite() {
            self.invalid_reasons.push(BuilderInvalidReason::BadPosition(position));
            return false;
        }
        if GridCoord::try_from_world(position, self.cell_size).is_none() {
            self.invalid_reasons.push(BuilderInvalidReason::OutOfGrid(position));
            return false;
        }
        true
    }

    /// Check the validity of this builder.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<BuilderInvalidReason>)` otherwise.
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`FlowNetwork`] and compute its initial flow.
    ///
    /// A network that starts out complete notifies no one, since it has no observers yet, but does lock if asked to.
    pub fn build(&self) -> Result<FlowNetwork, &Vec<BuilderInvalidReason>> {
        if let Some(reasons) = self.is_valid() {
            return Err(reasons);
        }

        let mut network = FlowNetwork::new(self.segments.clone(), self.nodes.clone(), self.cell_size, self.lock_on_complete);
        network.recompute();
        Ok(network)
    }
}
