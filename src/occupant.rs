use std::fmt::{Display, Formatter};

use itertools::Itertools;
use log::debug;

use crate::location::WorldPos;
use crate::shape::Direction;

/// Number of discrete orientations a [`Segment`] cycles through.
pub const ROTATION_STEPS: u8 = 4;

/// Index of a [`Segment`] in its network, in insertion order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SegmentId(pub usize);

/// Index of a [`Node`] in its network, in insertion order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(pub usize);

impl Display for SegmentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A rotatable occupant. Its connections are its base connections turned clockwise by the current rotation.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub(crate) position: WorldPos,
    pub(crate) base_connections: Vec<Direction>,
    pub(crate) rotation: u8,
    pub(crate) powered: bool,
}

impl Segment {
    /// A segment at rotation 0.
    pub fn new(position: WorldPos, base_connections: Vec<Direction>) -> Self {
        Self::with_rotation(position, base_connections, 0)
    }

    /// A segment already turned `rotation` quarters clockwise, wrapping at 4.
    pub fn with_rotation(position: WorldPos, base_connections: Vec<Direction>, rotation: u8) -> Self {
        Self {
            position,
            base_connections,
            rotation: rotation % ROTATION_STEPS,
            powered: false,
        }
    }

    /// Where the segment sits in world space.
    pub fn position(&self) -> WorldPos {
        self.position
    }

    /// Connections at rotation 0.
    pub fn base_connections(&self) -> &[Direction] {
        &self.base_connections
    }

    /// Current quarter-turn count, `0..4`.
    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    /// Whether the segment lies on the current flow path.
    pub fn is_powered(&self) -> bool {
        self.powered
    }

    pub(crate) fn set_powered(&mut self, powered: bool) {
        self.powered = powered;
    }

    /// Turn the segment a quarter clockwise, wrapping after a full cycle. Returns the new rotation.
    pub fn rotate_once(&mut self) -> u8 {
        self.rotation = (self.rotation + 1) % ROTATION_STEPS;
        debug!("segment rotated to step {}", self.rotation);
        self.rotation
    }

    /// Base connections rotated by the current step, in base order.
    pub fn current_connections(&self) -> Vec<Direction> {
        self.base_connections.iter()
            .map(|dir| dir.rotate(self.rotation))
            .collect_vec()
    }
}

/// The flow roles of a [`Node`]. Both may be set at once.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct NodeRole {
    /// Flow starts here.
    pub source: bool,
    /// Reaching this node completes the flow.
    pub target: bool,
}

impl NodeRole {
    /// A source and nothing else.
    pub const fn source() -> Self {
        Self { source: true, target: false }
    }

    /// A target and nothing else.
    pub const fn target() -> Self {
        Self { source: false, target: true }
    }

    /// A node which only passes flow along.
    pub const fn relay() -> Self {
        Self { source: false, target: false }
    }
}

/// A fixed occupant whose connections never change.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub(crate) position: WorldPos,
    pub(crate) connections: Vec<Direction>,
    pub(crate) role: NodeRole,
}

impl Node {
    /// A node with fixed `connections`.
    pub fn new(position: WorldPos, connections: Vec<Direction>, role: NodeRole) -> Self {
        Self { position, connections, role }
    }

    /// Where the node sits in world space.
    pub fn position(&self) -> WorldPos {
        self.position
    }

    /// The node's fixed connections.
    pub fn connections(&self) -> &[Direction] {
        &self.connections
    }

    /// See [`NodeRole::source`](NodeRole#structfield.source).
    pub fn is_source(&self) -> bool {
        self.role.source
    }

    /// See [`NodeRole::target`](NodeRole#structfield.target).
    pub fn is_target(&self) -> bool {
        self.role.target
    }
}
