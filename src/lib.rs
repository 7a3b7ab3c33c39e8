#![warn(missing_docs)]

//! # `rootflow`
//!
//! A solver for directional-connectivity puzzles: rotatable segments and fixed nodes sit on a square grid, each
//! connecting to some of the four compass directions, and the puzzle is solved once an unbroken chain of connections
//! runs from the source node to a target node.
//! Begin by describing a puzzle with a [`NetworkBuilder`], then [`build`](NetworkBuilder::build) it into a
//! [`FlowNetwork`]. Rotate segments with [`FlowNetwork::rotate`], or queue several rotations with
//! [`FlowNetwork::actuate`] and fold them into one recompute with [`FlowNetwork::settle`].
//!
//! Hosts that own their occupants elsewhere can skip the network entirely and call [`build_index`] and
//! [`recompute`](solver::recompute) on borrowed slices.
//!
//! # Internals
//! A recompute never reuses earlier work. It proceeds as follows:
//!
//! 1. Snap every occupant's world position to a [`GridCoord`] by dividing its horizontal components by the cell size.
//! A coordinate hosts at most one segment and at most one node. A segment's connections take precedence over those of
//! a node on the same cell.
//! 2. Run a breadth-first search from the source node's cell. A step from one cell to its neighbor in direction `d` is
//! only allowed if the neighbor in turn connects in the opposite of `d`; a connector pointing at a cell that does not
//! point back carries nothing.
//! 3. Stop at the first dequeued cell holding a target node and walk the parent links back to the source.
//!
//! Neighbors are tried in the order a cell declares its connections, so among paths of equal length the result is
//! always the same one.
//!
//! Segments on the found path are marked powered and all others are cleared. Observers registered with
//! [`FlowNetwork::subscribe`] hear about the flow completing or breaking only when that state actually changes.
//!
//! Faults in the puzzle description, such as a missing source, are logged through the [`log`] facade and yield a
//! broken flow. Recomputation never fails.

pub use board::{apply_power, FlowError, FlowNetwork, FlowObserver, FlowTransition, Mutation};
pub use builder::{BuilderInvalidReason, NetworkBuilder};
pub use cell::Cell;
pub use index::{build_index, GridIndex};
pub use location::{GridCoord, WorldPos};
pub use occupant::{Node, NodeId, NodeRole, Segment, SegmentId};
pub use shape::Direction;
pub use solver::{Flow, Terminals};

pub(crate) mod board;
/// Puzzle configuration.
pub mod builder;
/// Grid cells and their effective connections.
pub mod cell;
/// Snapping occupants onto the grid.
pub mod index;
/// World positions and grid coordinates.
pub mod location;
/// Segments and nodes.
pub mod occupant;
/// Compass directions.
pub mod shape;
/// The flow search.
pub mod solver;
