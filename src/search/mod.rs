//! The node-level search family: one generic traversal skeleton
//! parameterised by frontier discipline, direction and heuristic, plus a
//! dedicated bidirectional variant whose heuristics are computed against
//! the opposite frontier's current node rather than a fixed endpoint.

use crate::coordinate::{Coordinate, Move, Route};
use crate::error::LatticeError;
use crate::frontier::{Discipline, Frontier};
use crate::graph::{Graph, NodeId};

/// The closed set of search strategies, in the spec's ordinal-stable order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchMode {
    Dfs,
    ReverseDfs,
    BidirectionalDfs,
    Bfs,
    ReverseBfs,
    BidirectionalBfs,
    Gbfs,
    ReverseGbfs,
    BidirectionalGbfs,
    AStar,
    ReverseAStar,
    BidirectionalAStar,
    NegativeGbfs,
    ReverseNegativeGbfs,
    BidirectionalNegativeGbfs,
    NegativeAStar,
    ReverseNegativeAStar,
    BidirectionalNegativeAStar,
    Jps,
    ReverseJps,
    BidirectionalJps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Heuristic {
    None,
    Greedy,
    AStar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Forward,
    Reverse,
    Bidirectional,
}

pub(crate) struct Plan {
    pub(crate) discipline: Discipline,
    pub(crate) direction: Direction,
    pub(crate) heuristic: Heuristic,
}

pub(crate) fn plan_for(mode: SearchMode) -> Option<Plan> {
    use Direction::*;
    use Heuristic::*;

    let (discipline, direction, heuristic) = match mode {
        SearchMode::Dfs => (Discipline::Stack, Forward, None),
        SearchMode::ReverseDfs => (Discipline::Stack, Reverse, None),
        SearchMode::BidirectionalDfs => (Discipline::Stack, Bidirectional, None),
        SearchMode::Bfs => (Discipline::Queue, Forward, None),
        SearchMode::ReverseBfs => (Discipline::Queue, Reverse, None),
        SearchMode::BidirectionalBfs => (Discipline::Queue, Bidirectional, None),
        SearchMode::Gbfs => (Discipline::MinHeap, Forward, Greedy),
        SearchMode::ReverseGbfs => (Discipline::MinHeap, Reverse, Greedy),
        SearchMode::BidirectionalGbfs => (Discipline::MinHeap, Bidirectional, Greedy),
        SearchMode::AStar => (Discipline::MinHeap, Forward, AStar),
        SearchMode::ReverseAStar => (Discipline::MinHeap, Reverse, AStar),
        SearchMode::BidirectionalAStar => (Discipline::MinHeap, Bidirectional, AStar),
        SearchMode::NegativeGbfs => (Discipline::MaxHeap, Forward, Greedy),
        SearchMode::ReverseNegativeGbfs => (Discipline::MaxHeap, Reverse, Greedy),
        SearchMode::BidirectionalNegativeGbfs => (Discipline::MaxHeap, Bidirectional, Greedy),
        SearchMode::NegativeAStar => (Discipline::MaxHeap, Forward, AStar),
        SearchMode::ReverseNegativeAStar => (Discipline::MaxHeap, Reverse, AStar),
        SearchMode::BidirectionalNegativeAStar => (Discipline::MaxHeap, Bidirectional, AStar),
        SearchMode::Jps | SearchMode::ReverseJps | SearchMode::BidirectionalJps => return None,
    };
    Some(Plan { discipline, direction, heuristic })
}

/// Runs `mode` from `source` to `target`, both already resolved to node ids.
pub fn search(graph: &Graph, source: NodeId, target: NodeId, mode: SearchMode) -> Result<Route, LatticeError> {
    if source == target {
        return Ok(Route::new());
    }

    let Some(plan) = plan_for(mode) else {
        // JPS and its variants are documented placeholders; the spec permits
        // omitting them entirely and signalling with InvalidSearchMode.
        return Err(LatticeError::InvalidSearchMode(mode as u32));
    };

    match plan.direction {
        Direction::Forward => search_unidirectional(graph, source, target, plan.discipline, false, plan.heuristic),
        Direction::Reverse => search_unidirectional(graph, source, target, plan.discipline, true, plan.heuristic),
        Direction::Bidirectional => search_bidirectional(graph, source, target, plan.discipline, plan.heuristic),
    }
}

/// True when `mode` is one of the JPS placeholders.
pub fn is_unfinished(mode: SearchMode) -> bool {
    matches!(mode, SearchMode::Jps | SearchMode::ReverseJps | SearchMode::BidirectionalJps)
}

pub(crate) fn heuristic_priority(heuristic: Heuristic, depth: u64, from: Coordinate, far: Coordinate) -> u64 {
    match heuristic {
        Heuristic::None => 0,
        Heuristic::Greedy => from.manhattan_distance(far),
        Heuristic::AStar => depth + from.manhattan_distance(far),
    }
}

/// One direction's per-query bookkeeping: who discovered each node, by
/// which move, and at what depth (used by the A* heuristic's g-term).
struct Visit {
    predecessor: Vec<Option<NodeId>>,
    entering_move: Vec<Option<Move>>,
    depth: Vec<u64>,
}

impl Visit {
    fn new(n: usize) -> Self {
        Visit {
            predecessor: vec![None; n],
            entering_move: vec![None; n],
            depth: vec![0; n],
        }
    }

    fn touched(&self, node: NodeId) -> bool {
        self.entering_move[node.index()].is_some()
    }
}

/// Walks `hit`'s predecessor chain back to `start`, collecting moves.
/// `reverse_result` mirrors the spec's "reversing when direction is
/// FORWARD so moves read source-to-target".
fn reconstruct(visit: &Visit, start: NodeId, hit: NodeId, reverse_result: bool) -> Vec<Move> {
    let mut moves = Vec::new();
    let mut current = hit;
    while current != start {
        let mv = visit.entering_move[current.index()].expect("touched node must have an entering move");
        moves.push(mv);
        current = visit.predecessor[current.index()].expect("touched node must have a predecessor");
    }
    if reverse_result {
        moves.reverse();
    }
    moves
}

fn search_unidirectional(
    graph: &Graph,
    source: NodeId,
    target: NodeId,
    discipline: Discipline,
    reverse: bool,
    heuristic: Heuristic,
) -> Result<Route, LatticeError> {
    let n = graph.node_count();
    let mut visit = Visit::new(n);

    let (start, far) = if reverse { (target, source) } else { (source, target) };
    let far_coordinate = graph.coordinate_of(far);

    let mut frontier = Frontier::new(discipline);

    for (neighbour, mv) in expand(graph, start, reverse) {
        if !visit.touched(neighbour) {
            visit.predecessor[neighbour.index()] = Some(start);
            visit.entering_move[neighbour.index()] = Some(mv);
            visit.depth[neighbour.index()] = 1;
            let priority = heuristic_priority(heuristic, 1, graph.coordinate_of(neighbour), far_coordinate);
            frontier.push(neighbour, priority);
        }
    }

    while let Some(popped) = frontier.pop() {
        if popped == far {
            return Ok(Route::from(reconstruct(&visit, start, popped, !reverse)));
        }
        let depth = visit.depth[popped.index()] + 1;
        for (neighbour, mv) in expand(graph, popped, reverse) {
            if !visit.touched(neighbour) {
                visit.predecessor[neighbour.index()] = Some(popped);
                visit.entering_move[neighbour.index()] = Some(mv);
                visit.depth[neighbour.index()] = depth;
                let priority = heuristic_priority(heuristic, depth, graph.coordinate_of(neighbour), far_coordinate);
                frontier.push(neighbour, priority);
            }
        }
    }

    Err(LatticeError::Untraversable(graph.coordinate_of(source), graph.coordinate_of(target)))
}

fn search_bidirectional(
    graph: &Graph,
    source: NodeId,
    target: NodeId,
    discipline: Discipline,
    heuristic: Heuristic,
) -> Result<Route, LatticeError> {
    let n = graph.node_count();
    let mut forward = Visit::new(n);
    let mut backward = Visit::new(n);

    let mut forward_frontier = Frontier::new(discipline);
    let mut backward_frontier = Frontier::new(discipline);

    let mut forward_current = source;
    let mut backward_current = target;

    seed(graph, &mut forward, &mut forward_frontier, source, false, heuristic, graph.coordinate_of(backward_current));
    seed(graph, &mut backward, &mut backward_frontier, target, true, heuristic, graph.coordinate_of(forward_current));

    loop {
        if forward_frontier.is_empty() && backward_frontier.is_empty() {
            break;
        }

        if let Some(popped) = forward_frontier.pop() {
            forward_current = popped;
            if popped == target || backward.touched(popped) {
                return Ok(stitch(&forward, &backward, source, target, popped));
            }
            let depth = forward.depth[popped.index()] + 1;
            let far = graph.coordinate_of(backward_current);
            for (neighbour, mv) in expand(graph, popped, false) {
                if !forward.touched(neighbour) {
                    forward.predecessor[neighbour.index()] = Some(popped);
                    forward.entering_move[neighbour.index()] = Some(mv);
                    forward.depth[neighbour.index()] = depth;
                    let priority = heuristic_priority(heuristic, depth, graph.coordinate_of(neighbour), far);
                    forward_frontier.push(neighbour, priority);
                }
            }
        }

        if let Some(popped) = backward_frontier.pop() {
            backward_current = popped;
            if popped == source || forward.touched(popped) {
                return Ok(stitch(&forward, &backward, source, target, popped));
            }
            let depth = backward.depth[popped.index()] + 1;
            let far = graph.coordinate_of(forward_current);
            for (neighbour, mv) in expand(graph, popped, true) {
                if !backward.touched(neighbour) {
                    backward.predecessor[neighbour.index()] = Some(popped);
                    backward.entering_move[neighbour.index()] = Some(mv);
                    backward.depth[neighbour.index()] = depth;
                    let priority = heuristic_priority(heuristic, depth, graph.coordinate_of(neighbour), far);
                    backward_frontier.push(neighbour, priority);
                }
            }
        }
    }

    Err(LatticeError::Untraversable(graph.coordinate_of(source), graph.coordinate_of(target)))
}

#[allow(clippy::too_many_arguments)]
fn seed(
    graph: &Graph,
    visit: &mut Visit,
    frontier: &mut Frontier<NodeId>,
    start: NodeId,
    reverse: bool,
    heuristic: Heuristic,
    far_coordinate: Coordinate,
) {
    for (neighbour, mv) in expand(graph, start, reverse) {
        if !visit.touched(neighbour) {
            visit.predecessor[neighbour.index()] = Some(start);
            visit.entering_move[neighbour.index()] = Some(mv);
            visit.depth[neighbour.index()] = 1;
            let priority = heuristic_priority(heuristic, 1, graph.coordinate_of(neighbour), far_coordinate);
            frontier.push(neighbour, priority);
        }
    }
}

fn stitch(forward: &Visit, backward: &Visit, source: NodeId, target: NodeId, meeting: NodeId) -> Route {
    let prefix = if meeting == source { Vec::new() } else { reconstruct(forward, source, meeting, true) };
    let suffix = if meeting == target { Vec::new() } else { reconstruct(backward, target, meeting, false) };
    let mut moves = prefix;
    moves.extend(suffix);
    Route::from(moves)
}

fn expand(graph: &Graph, node: NodeId, reverse: bool) -> Vec<(NodeId, Move)> {
    if reverse {
        graph.incoming(node).map(|arc| (arc.from, arc.mv)).collect()
    } else {
        graph.outgoing(node).map(|arc| (arc.to, arc.mv)).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::coordinate::Coordinate;

    fn line_graph() -> (Graph, NodeId, NodeId) {
        let mut g = Graph::new();
        let a = g.place_node(Coordinate::new(0, 0, 1));
        let b = g.place_node(Coordinate::new(1, 0, 1));
        let c = g.place_node(Coordinate::new(2, 0, 1));
        let d = g.place_node(Coordinate::new(3, 0, 1));
        for (from, to) in [(a, b), (b, c), (c, d)] {
            g.link(from, to, Move::East);
            g.link(to, from, Move::West);
        }
        (g, a, d)
    }

    #[test]
    fn bfs_finds_forward_route() {
        let (g, a, d) = line_graph();
        let route = search(&g, a, d, SearchMode::Bfs).unwrap();
        assert_eq!(route.to_string(), "eee");
    }

    #[test]
    fn reverse_bfs_reads_the_same_direction() {
        let (g, a, d) = line_graph();
        let route = search(&g, d, a, SearchMode::Bfs).unwrap();
        assert_eq!(route.to_string(), "www");
    }

    #[test]
    fn trivial_query_is_empty() {
        let (g, a, _d) = line_graph();
        let route = search(&g, a, a, SearchMode::Dfs).unwrap();
        assert!(route.is_empty());
    }

    #[test]
    fn astar_reaches_target() {
        let (g, a, d) = line_graph();
        let route = search(&g, a, d, SearchMode::AStar).unwrap();
        assert_eq!(crate::travel::travel(&g, a, &route).unwrap(), d);
    }

    #[test]
    fn disconnected_nodes_are_untraversable() {
        let mut g = Graph::new();
        let a = g.place_node(Coordinate::new(0, 0, 1));
        let b = g.place_node(Coordinate::new(50, 50, 1));
        assert!(matches!(search(&g, a, b, SearchMode::Bfs), Err(LatticeError::Untraversable(_, _))));
    }

    #[test]
    fn bidirectional_bfs_meets_in_the_middle() {
        let (g, a, d) = line_graph();
        let route = search(&g, a, d, SearchMode::BidirectionalBfs).unwrap();
        assert_eq!(crate::travel::travel(&g, a, &route).unwrap(), d);
    }

    #[test]
    fn jps_is_unfinished() {
        assert!(is_unfinished(SearchMode::Jps));
        assert!(!is_unfinished(SearchMode::Dfs));
    }
}
