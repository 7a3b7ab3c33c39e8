use std::collections::{HashMap, HashSet, VecDeque};

use itertools::Itertools;
use log::{debug, error, warn};
use petgraph::graphmap::UnGraphMap;
use unordered_pair::UnorderedPair;

use crate::cell::Cell;
use crate::index::GridIndex;
use crate::location::GridCoord;
use crate::occupant::{Node, NodeId};
use crate::shape::Direction;

/// The source and targets of a network, picked out of its nodes.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Terminals {
    /// The node the flow starts from, if any node is flagged as a source.
    pub source: Option<NodeId>,
    /// Every target-flagged node, in input order.
    pub targets: Vec<NodeId>,
}

impl Terminals {
    /// Scan `nodes` in order. The first source-flagged node is the source; every target-flagged node is a target.
    ///
    /// Missing or duplicate sources and a missing target are reported but never fatal.
    pub fn select(nodes: &[Node]) -> Self {
        let sources = nodes.iter().positions(Node::is_source).map(NodeId).collect_vec();
        let targets = nodes.iter().positions(Node::is_target).map(NodeId).collect_vec();

        match sources.as_slice() {
            [] => warn!("no node is flagged as a source"),
            [_] => {}
            [first, rest @ ..] => warn!("{} extra source nodes ignored, using node {}", rest.len(), first.0),
        }
        if targets.is_empty() {
            warn!("no node is flagged as a target");
        }

        Self { source: sources.first().copied(), targets }
    }
}

/// The outcome of one recompute: whether the flow reaches a target, and the cells it runs through.
///
/// `path` runs from the source cell to the target cell and is empty whenever `complete` is false.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Flow {
    /// Whether a target was reached.
    pub complete: bool,
    /// Source-first chain of cells carrying the flow.
    pub path: Vec<Cell>,
}

impl Flow {
    /// No flow, no path.
    pub fn broken() -> Self {
        Self::default()
    }

    /// Coordinates of the path cells, source first.
    pub fn path_coords(&self) -> Vec<GridCoord> {
        self.path.iter().map(|cell| cell.coord).collect_vec()
    }
}

/// Search for a flow from `source` to any target-flagged node over the links of `index`.
///
/// The search is breadth-first and tries each cell's connections in their declared order, so the returned path is a
/// shortest one and the same inputs always yield the same path. A link is only followed if the neighbor connects back.
pub fn recompute(index: &GridIndex, source: Option<NodeId>, targets: &[NodeId]) -> Flow {
    let Some(source) = source else {
        return Flow::broken();
    };
    if targets.is_empty() {
        return Flow::broken();
    }

    let Some(start) = index.coord_of_node(source).and_then(|coord| index.get(coord)).copied() else {
        warn!("source node {} is not on the grid", source.0);
        return Flow::broken();
    };

    let mut visited = HashSet::from([start.coord]);
    let mut frontier = VecDeque::from([start]);
    let mut parents: HashMap<GridCoord, GridCoord> = HashMap::new();
    let mut found = None;

    while let Some(current) = frontier.pop_front() {
        if index.occupants(&current).is_target() {
            found = Some(current);
            break;
        }

        for dir in index.connections_of(&current) {
            let Some(neighbor) = dir.attempt_from(current.coord).and_then(|coord| index.get(coord)) else {
                continue;
            };
            if visited.contains(&neighbor.coord) {
                continue;
            }
            if index.connections_of(neighbor).contains(&dir.opposite()) {
                visited.insert(neighbor.coord);
                parents.insert(neighbor.coord, current.coord);
                frontier.push_back(*neighbor);
            }
        }
    }

    let flow = match found {
        Some(goal) => Flow {
            complete: true,
            path: reconstruct_path(index, start.coord, goal.coord, &parents),
        },
        None => Flow::broken(),
    };
    debug!(
        "flow recomputed: complete={} path=[{}]",
        flow.complete,
        flow.path.iter().map(|cell| cell.coord).join(", ")
    );
    flow
}

/// Walk `parents` back from `goal` to `start`, then flip to source-first order.
///
/// A gap in the chain stops the walk and yields what was gathered so far.
pub(crate) fn reconstruct_path(
    index: &GridIndex,
    start: GridCoord,
    goal: GridCoord,
    parents: &HashMap<GridCoord, GridCoord>,
) -> Vec<Cell> {
    let mut coords = vec![goal];
    let mut current = goal;

    while current != start {
        match parents.get(&current) {
            Some(prev) => {
                current = *prev;
                coords.push(current);
            }
            None => {
                error!("path reconstruction lost its way at {current}, returning a partial path");
                break;
            }
        }
    }

    coords.into_iter()
        .rev()
        .filter_map(|coord| index.get(coord).copied())
        .collect_vec()
}

/// Every mutually agreed link between neighboring cells, as an undirected graph.
///
/// Every indexed cell is a node, linked or not. Each edge carries the direction from its lower endpoint to its higher one.
pub fn link_graph(index: &GridIndex) -> UnGraphMap<GridCoord, Direction> {
    let mut graph = UnGraphMap::with_capacity(index.len(), index.len() * 2);
    let mut seen = HashSet::new();

    for cell in index.cells() {
        graph.add_node(cell.coord);
    }

    for cell in index.cells() {
        for dir in index.connections_of(cell) {
            let Some(neighbor) = dir.attempt_from(cell.coord).and_then(|coord| index.get(coord)) else {
                continue;
            };
            if !index.connections_of(neighbor).contains(&dir.opposite()) {
                continue;
            }
            if seen.insert(UnorderedPair(cell.coord, neighbor.coord)) {
                let (lo, hi) = if cell.coord < neighbor.coord { (cell.coord, neighbor.coord) } else { (neighbor.coord, cell.coord) };
                let direction = if lo == cell.coord { dir } else { dir.opposite() };
                debug_assert_eq!(Direction::between(lo, hi), Some(direction));
                graph.add_edge(lo, hi, direction);
            }
        }
    }

    graph
}
