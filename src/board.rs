use std::collections::VecDeque;
use std::fmt::{Display, Formatter};

use itertools::Itertools;
use log::{debug, info};
use ndarray::Array2;
use petgraph::graphmap::UnGraphMap;
use thiserror::Error;

use crate::cell::Cell;
use crate::index::{build_index, GridIndex};
use crate::location::GridCoord;
use crate::occupant::{Node, NodeId, Segment, SegmentId};
use crate::shape::Direction;
use crate::solver::{self, Flow, Terminals};

/// Failures of host-driven operations on a [`FlowNetwork`]. Recomputation itself never fails.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum FlowError {
    /// The id does not name a segment of this network.
    #[error("no segment with id {0}")]
    UnknownSegment(SegmentId),
    /// The network locked its segments when the flow completed.
    #[error("segment {0} is locked because the flow is complete")]
    SegmentLocked(SegmentId),
}

/// A change to occupant state, waiting to be folded into the next recompute.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mutation {
    /// A segment was actuated and now sits at `rotation`.
    SegmentRotated {
        /// The segment that turned.
        segment: SegmentId,
        /// Its quarter-turn count afterwards.
        rotation: u8,
    },
}

/// A change of the flow-complete state between two recomputes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FlowTransition {
    /// The flow now reaches a target.
    Completed,
    /// The flow no longer reaches a target.
    Broken,
}

/// Receives edge-triggered notifications from a [`FlowNetwork`].
pub trait FlowObserver {
    /// The flow went from broken to complete; `flow` is the new result.
    fn on_flow_completed(&mut self, flow: &Flow);
    /// The flow went from complete to broken.
    fn on_flow_broken(&mut self);
}

/// Clear every segment's powered flag, then power the segments sitting on `flow`'s path.
pub fn apply_power(segments: &mut [Segment], flow: &Flow) {
    for segment in segments.iter_mut() {
        segment.set_powered(false);
    }

    for SegmentId(i) in flow.path.iter().filter_map(|cell| cell.segment) {
        if let Some(segment) = segments.get_mut(i) {
            segment.set_powered(true);
        }
    }
}

/// One puzzle instance: the occupants it owns, its current flow, and the observers of that flow.
///
/// All mutation goes through `&mut self`, so a recompute can never observe a half-applied rotation.
/// Networks should be built using a [`NetworkBuilder`](crate::builder::NetworkBuilder).
pub struct FlowNetwork {
    pub(crate) segments: Vec<Segment>,
    pub(crate) nodes: Vec<Node>,
    pub(crate) cell_size: f32,
    pub(crate) terminals: Terminals,
    pub(crate) lock_on_complete: bool,
    pub(crate) flow: Flow,
    pub(crate) locked: bool,
    pub(crate) pending: VecDeque<Mutation>,
    pub(crate) observers: Vec<Box<dyn FlowObserver>>,
}

impl FlowNetwork {
    pub(crate) fn new(segments: Vec<Segment>, nodes: Vec<Node>, cell_size: f32, lock_on_complete: bool) -> Self {
        let terminals = Terminals::select(&nodes);
        Self {
            segments,
            nodes,
            cell_size,
            terminals,
            lock_on_complete,
            flow: Flow::broken(),
            locked: false,
            pending: VecDeque::new(),
            observers: Vec::new(),
        }
    }

    /// Register an observer. It only hears about transitions that happen after this call.
    pub fn subscribe(&mut self, observer: Box<dyn FlowObserver>) {
        self.observers.push(observer);
    }

    /// Turn a segment a quarter clockwise and queue the change for the next [`settle`](Self::settle).
    pub fn actuate(&mut self, id: SegmentId) -> Result<u8, FlowError> {
        let segment = self.segments.get_mut(id.0).ok_or(FlowError::UnknownSegment(id))?;
        if self.locked {
            return Err(FlowError::SegmentLocked(id));
        }
        let rotation = segment.rotate_once();
        self.pending.push_back(Mutation::SegmentRotated { segment: id, rotation });
        Ok(rotation)
    }

    /// Fold every queued mutation into a single recompute.
    ///
    /// Does nothing and returns `None` if no mutation is pending.
    pub fn settle(&mut self) -> Option<FlowTransition> {
        if self.pending.is_empty() {
            return None;
        }
        let drained = self.pending.drain(..).collect_vec();
        debug!("settling {} pending mutations: {:?}", drained.len(), drained);
        self.recompute()
    }

    /// Actuate one segment and recompute straight away.
    pub fn rotate(&mut self, id: SegmentId) -> Result<Option<FlowTransition>, FlowError> {
        self.actuate(id)?;
        Ok(self.settle())
    }

    /// Rebuild the index from live occupant state, search for a flow, power the path and notify observers on a change.
    pub fn recompute(&mut self) -> Option<FlowTransition> {
        let flow = {
            let index = build_index(&self.segments, &self.nodes, self.cell_size);
            solver::recompute(&index, self.terminals.source, &self.terminals.targets)
        };
        apply_power(&mut self.segments, &flow);

        let transition = match (self.flow.complete, flow.complete) {
            (false, true) => Some(FlowTransition::Completed),
            (true, false) => Some(FlowTransition::Broken),
            _ => None,
        };
        self.flow = flow;

        match transition {
            Some(FlowTransition::Completed) => {
                info!("flow completed through {} cells", self.flow.path.len());
                if self.lock_on_complete {
                    self.locked = true;
                }
                for observer in self.observers.iter_mut() {
                    observer.on_flow_completed(&self.flow);
                }
            }
            Some(FlowTransition::Broken) => {
                info!("flow broken");
                for observer in self.observers.iter_mut() {
                    observer.on_flow_broken();
                }
            }
            None => {}
        }

        transition
    }

    /// The result of the last recompute.
    pub fn flow(&self) -> &Flow {
        &self.flow
    }

    /// Whether the last recompute reached a target.
    pub fn is_flow_complete(&self) -> bool {
        self.flow.complete
    }

    /// Coordinates of the powered path, source first.
    pub fn path_coords(&self) -> Vec<GridCoord> {
        self.flow.path_coords()
    }

    /// Whether segments have stopped accepting actuation after the flow completed.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Mutations queued by [`actuate`](Self::actuate) and not yet settled.
    pub fn pending(&self) -> impl Iterator<Item = &Mutation> {
        self.pending.iter()
    }

    /// The source and targets picked when the network was built.
    pub fn terminals(&self) -> &Terminals {
        &self.terminals
    }

    /// Grid spacing in world units.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Look up a segment by id.
    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id.0)
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// All segments, in id order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// All nodes, in id order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// A fresh index over the current occupants.
    pub fn index(&self) -> GridIndex<'_> {
        build_index(&self.segments, &self.nodes, self.cell_size)
    }

    /// Current connections of whatever sits at `coord`; empty if nothing does.
    pub fn connections_at(&self, coord: GridCoord) -> Vec<Direction> {
        let index = self.index();
        index.get(coord).map(|cell| index.connections_of(cell)).unwrap_or_default()
    }

    /// See [`solver::link_graph`].
    pub fn link_graph(&self) -> UnGraphMap<GridCoord, Direction> {
        solver::link_graph(&self.index())
    }
}

/// Box-drawing glyph for a set of connections, heavy when powered.
fn glyph(connections: &[Direction], powered: bool) -> char {
    let has = |dir| connections.contains(&dir);
    let key = (has(Direction::North), has(Direction::East), has(Direction::South), has(Direction::West));
    let (light, heavy) = match key {
        (false, false, false, false) => ('·', '•'),
        (true, false, false, false) => ('╵', '╹'),
        (false, true, false, false) => ('╶', '╺'),
        (false, false, true, false) => ('╷', '╻'),
        (false, false, false, true) => ('╴', '╸'),
        (true, false, true, false) => ('│', '┃'),
        (false, true, false, true) => ('─', '━'),
        (true, true, false, false) => ('└', '┗'),
        (false, true, true, false) => ('┌', '┏'),
        (false, false, true, true) => ('┐', '┓'),
        (true, false, false, true) => ('┘', '┛'),
        (true, true, true, false) => ('├', '┣'),
        (false, true, true, true) => ('┬', '┳'),
        (true, false, true, true) => ('┤', '┫'),
        (true, true, false, true) => ('┴', '┻'),
        (true, true, true, true) => ('┼', '╋'),
    };
    if powered { heavy } else { light }
}

/// Largest bounding box, in cells, drawn as a grid. Anything bigger is listed cell by cell.
const MAX_RENDERED_CELLS: i64 = 1 << 20;

fn cell_char(index: &GridIndex, cell: &Cell) -> char {
    let occupants = index.occupants(cell);
    match (occupants.segment, occupants.node) {
        (Some(segment), _) => glyph(&segment.current_connections(), segment.is_powered()),
        (None, Some(node)) if node.is_source() => 'S',
        (None, Some(node)) if node.is_target() => 'T',
        (None, Some(_)) => 'o',
        (None, None) => '.',
    }
}

fn print(board: Array2<char>) -> String {
    let mut out = String::with_capacity(board.nrows() * (board.ncols() + 1));

    for row in board.rows() {
        for col in row {
            out.push(*col);
        }
        out.push('\n');
    }

    out
}

impl Display for FlowNetwork {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let index = self.index();
        let Some((lo, hi)) = index.bounds() else {
            return Ok(());
        };

        let rows = i64::from(hi.1) - i64::from(lo.1) + 1;
        let cols = i64::from(hi.0) - i64::from(lo.0) + 1;
        if rows.saturating_mul(cols) > MAX_RENDERED_CELLS {
            for cell in index.cells() {
                writeln!(f, "{} {}", cell_char(&index, cell), cell.coord)?;
            }
            return Ok(());
        }

        let mut board = Array2::from_elem((rows as usize, cols as usize), '.');
        for cell in index.cells() {
            // north on top
            let row = (i64::from(hi.1) - i64::from(cell.coord.1)) as usize;
            let col = (i64::from(cell.coord.0) - i64::from(lo.0)) as usize;
            board[[row, col]] = cell_char(&index, cell);
        }

        write!(f, "{}", print(board))
    }
}
