//! The hierarchical search family: a generic skeleton over the condensed
//! super-graph, reusing the node-level dispatch table and heuristic
//! machinery, with route materialisation that recursively invokes the
//! node-level search to fill in each crossed component.

use crate::condense::{Condensation, SuperArc, SuperId};
use crate::coordinate::{Coordinate, Move, Route};
use crate::error::LatticeError;
use crate::frontier::Frontier;
use crate::graph::{Graph, NodeId};
use crate::search::{self, Direction, Heuristic, SearchMode};

/// Runs `super_mode` over the condensed super-graph from `source`'s
/// component to `target`'s, then `sub_mode` to fill in the segments
/// within and at the boundary of each crossed component. Bypasses the
/// super-level entirely when both endpoints already share a component.
pub fn super_search(
    graph: &Graph,
    condensation: &Condensation,
    source: NodeId,
    target: NodeId,
    super_mode: SearchMode,
    sub_mode: SearchMode,
) -> Result<Route, LatticeError> {
    let source_super = graph.node(source).super_node.expect("condense() must run before super_search");
    let target_super = graph.node(target).super_node.expect("condense() must run before super_search");

    if source_super == target_super {
        return search::search(graph, source, target, sub_mode);
    }

    let Some(plan) = search::plan_for(super_mode) else {
        return Err(LatticeError::InvalidSearchMode(super_mode as u32));
    };

    match plan.direction {
        Direction::Forward => {
            let meta = run_super(graph, condensation, source_super, target_super, plan.discipline, false, plan.heuristic, source, target)?;
            materialize_forward(graph, source, target, source_super, target_super, &meta, sub_mode)
        }
        Direction::Reverse => {
            let meta = run_super(graph, condensation, source_super, target_super, plan.discipline, true, plan.heuristic, source, target)?;
            materialize_reverse(graph, source, target, source_super, target_super, &meta, sub_mode)
        }
        Direction::Bidirectional => super_search_bidirectional(graph, condensation, source, target, source_super, target_super, plan.discipline, plan.heuristic, sub_mode),
    }
}

/// Per-super-node bookkeeping. `exit`/`entry` carry the direction-dependent
/// meaning documented on [`materialize_forward`]/[`materialize_reverse`].
struct SuperMeta {
    predecessor: Vec<Option<SuperId>>,
    exit: Vec<Option<NodeId>>,
    entry: Vec<Option<NodeId>>,
    mv: Vec<Option<Move>>,
}

impl SuperMeta {
    fn new(c: usize) -> Self {
        SuperMeta {
            predecessor: vec![None; c],
            exit: vec![None; c],
            entry: vec![None; c],
            mv: vec![None; c],
        }
    }

    fn touched(&self, id: SuperId) -> bool {
        self.mv[id.index()].is_some()
    }
}

fn crossing_arcs<'a>(condensation: &'a Condensation, id: SuperId, reverse: bool) -> &'a [SuperArc] {
    if reverse {
        &condensation.super_node(id).incoming
    } else {
        &condensation.super_node(id).outgoing
    }
}

#[allow(clippy::too_many_arguments)]
fn run_super(
    graph: &Graph,
    condensation: &Condensation,
    source_super: SuperId,
    target_super: SuperId,
    discipline: crate::frontier::Discipline,
    reverse: bool,
    heuristic: Heuristic,
    source: NodeId,
    target: NodeId,
) -> Result<SuperMeta, LatticeError> {
    let c = condensation.super_node_count();
    let mut meta = SuperMeta::new(c);

    let (start, far_node) = if reverse { (target_super, source) } else { (source_super, target) };
    let goal = if reverse { source_super } else { target_super };
    let far_coordinate = graph.coordinate_of(far_node);

    let mut frontier: Frontier<SuperId> = Frontier::new(discipline);

    for arc in crossing_arcs(condensation, start, reverse) {
        let neighbour = arc.other;
        if !meta.touched(neighbour) {
            seed_super(graph, &mut meta, &mut frontier, start, arc, heuristic, far_coordinate, reverse);
        }
    }

    while let Some(popped) = frontier.pop() {
        if popped == goal {
            return Ok(meta);
        }
        for arc in crossing_arcs(condensation, popped, reverse) {
            let neighbour = arc.other;
            if !meta.touched(neighbour) {
                seed_super(graph, &mut meta, &mut frontier, popped, arc, heuristic, far_coordinate, reverse);
            }
        }
    }

    Err(LatticeError::Untraversable(graph.coordinate_of(source), graph.coordinate_of(target)))
}

#[allow(clippy::too_many_arguments)]
fn seed_super(
    graph: &Graph,
    meta: &mut SuperMeta,
    frontier: &mut Frontier<SuperId>,
    current: SuperId,
    arc: &SuperArc,
    heuristic: Heuristic,
    far_coordinate: Coordinate,
    reverse: bool,
) {
    let neighbour = arc.other;
    let link = graph.arc(arc.link);

    meta.predecessor[neighbour.index()] = Some(current);
    meta.mv[neighbour.index()] = Some(link.mv);
    // `arc.exit` and `link.to` are the "from"/"to" ends of the crossing arc
    // as stored by condense(): walking `current`'s outgoing list (FORWARD)
    // puts exit in `current` and entry in `neighbour`; walking its incoming
    // list (REVERSE) puts exit in `neighbour` and entry in `current` —
    // either way this is exactly the pairing materialize_forward/reverse need.
    meta.exit[neighbour.index()] = Some(arc.exit);
    meta.entry[neighbour.index()] = Some(link.to);

    let heuristic_node = if reverse { arc.exit } else { link.to };
    let priority = search::heuristic_priority(heuristic, 0, graph.coordinate_of(heuristic_node), far_coordinate);
    frontier.push(neighbour, priority);
}

/// FORWARD materialisation: prefix segments accumulate root-ward from the
/// destination super-node back to the source super-node (spec 4.5).
fn materialize_forward(
    graph: &Graph,
    source: NodeId,
    target: NodeId,
    source_super: SuperId,
    target_super: SuperId,
    meta: &SuperMeta,
    sub_mode: SearchMode,
) -> Result<Route, LatticeError> {
    let entry_target = meta.entry[target_super.index()].expect("target_super was discovered");
    let mut route = search::search(graph, entry_target, target, sub_mode)?;

    let mut cur = target_super;
    while cur != source_super {
        let mv = meta.mv[cur.index()].unwrap();
        let pred = meta.predecessor[cur.index()].unwrap();
        let exit = meta.exit[cur.index()].unwrap();

        route.push_front(mv);

        let segment_start = if pred == source_super { source } else { meta.entry[pred.index()].unwrap() };
        let segment = search::search(graph, segment_start, exit, sub_mode)?;
        route.prepend(segment);

        cur = pred;
    }

    Ok(route)
}

/// REVERSE materialisation: mirrors `materialize_forward`, accumulating
/// suffix segments leaf-ward from the source super-node toward the target.
fn materialize_reverse(
    graph: &Graph,
    source: NodeId,
    target: NodeId,
    source_super: SuperId,
    target_super: SuperId,
    meta: &SuperMeta,
    sub_mode: SearchMode,
) -> Result<Route, LatticeError> {
    let exit_source = meta.exit[source_super.index()].expect("source_super was discovered");
    let mut route = search::search(graph, source, exit_source, sub_mode)?;

    let mut cur = source_super;
    loop {
        let mv = meta.mv[cur.index()].unwrap();
        let pred = meta.predecessor[cur.index()].unwrap();
        let entry = meta.entry[cur.index()].unwrap();

        route.push_back(mv);

        if pred == target_super {
            let segment = search::search(graph, entry, target, sub_mode)?;
            route.append(segment);
            return Ok(route);
        }

        let segment = search::search(graph, entry, meta.exit[pred.index()].unwrap(), sub_mode)?;
        route.append(segment);
        cur = pred;
    }
}

/// BIDIRECTIONAL: stitches a forward prefix (source to the meeting
/// super-node's exit) and a backward suffix (meeting super-node's entry
/// to target), with one sub-algorithm call spanning the meeting
/// super-node itself. The source's bidirectional super-search carries a
/// documented defect when the meeting point coincides with an endpoint's
/// own super-node; this implementation follows the spec's stated
/// intended contract (a single sub-segment call across the meeting
/// component) rather than reproducing that defect — see DESIGN.md.
#[allow(clippy::too_many_arguments)]
fn super_search_bidirectional(
    graph: &Graph,
    condensation: &Condensation,
    source: NodeId,
    target: NodeId,
    source_super: SuperId,
    target_super: SuperId,
    discipline: crate::frontier::Discipline,
    heuristic: Heuristic,
    sub_mode: SearchMode,
) -> Result<Route, LatticeError> {
    let c = condensation.super_node_count();
    let mut forward = SuperMeta::new(c);
    let mut backward = SuperMeta::new(c);

    let mut forward_frontier: Frontier<SuperId> = Frontier::new(discipline);
    let mut backward_frontier: Frontier<SuperId> = Frontier::new(discipline);

    let target_coordinate = graph.coordinate_of(target);
    let source_coordinate = graph.coordinate_of(source);

    for arc in crossing_arcs(condensation, source_super, false) {
        seed_super(graph, &mut forward, &mut forward_frontier, source_super, arc, heuristic, target_coordinate, false);
    }
    for arc in crossing_arcs(condensation, target_super, true) {
        seed_super(graph, &mut backward, &mut backward_frontier, target_super, arc, heuristic, source_coordinate, true);
    }

    loop {
        if forward_frontier.is_empty() && backward_frontier.is_empty() {
            break;
        }

        if let Some(popped) = forward_frontier.pop() {
            if popped == target_super || backward.touched(popped) {
                return stitch_super(graph, source, target, source_super, target_super, popped, &forward, &backward, sub_mode);
            }
            for arc in crossing_arcs(condensation, popped, false) {
                let neighbour = arc.other;
                if !forward.touched(neighbour) {
                    seed_super(graph, &mut forward, &mut forward_frontier, popped, arc, heuristic, target_coordinate, false);
                }
            }
        }

        if let Some(popped) = backward_frontier.pop() {
            if popped == source_super || forward.touched(popped) {
                return stitch_super(graph, source, target, source_super, target_super, popped, &forward, &backward, sub_mode);
            }
            for arc in crossing_arcs(condensation, popped, true) {
                let neighbour = arc.other;
                if !backward.touched(neighbour) {
                    seed_super(graph, &mut backward, &mut backward_frontier, popped, arc, heuristic, source_coordinate, true);
                }
            }
        }
    }

    Err(LatticeError::Untraversable(graph.coordinate_of(source), graph.coordinate_of(target)))
}

#[allow(clippy::too_many_arguments)]
fn stitch_super(
    graph: &Graph,
    source: NodeId,
    target: NodeId,
    source_super: SuperId,
    target_super: SuperId,
    meeting: SuperId,
    forward: &SuperMeta,
    backward: &SuperMeta,
    sub_mode: SearchMode,
) -> Result<Route, LatticeError> {
    // Forward prefix: source up to the meeting super-node's exit.
    let mut prefix = Route::new();
    if meeting != source_super {
        let mut cur = meeting;
        while cur != source_super {
            let mv = forward.mv[cur.index()].unwrap();
            let pred = forward.predecessor[cur.index()].unwrap();
            let exit = forward.exit[cur.index()].unwrap();

            prefix.push_front(mv);
            let segment_start = if pred == source_super { source } else { forward.entry[pred.index()].unwrap() };
            let segment = search::search(graph, segment_start, exit, sub_mode)?;
            prefix.prepend(segment);
            cur = pred;
        }
    }

    // The meeting super-node's own segment: forward's entry into it, to
    // backward's exit out of it (or straight to source/target when the
    // meeting point is itself an endpoint's component).
    let meeting_entry = if meeting == source_super { source } else { forward.entry[meeting.index()].unwrap() };
    let meeting_exit = if meeting == target_super { target } else { backward.entry[meeting.index()].unwrap() };
    let meeting_segment = search::search(graph, meeting_entry, meeting_exit, sub_mode)?;

    // Backward suffix: meeting super-node's exit to target.
    let mut suffix = Route::new();
    if meeting != target_super {
        let mut cur = meeting;
        loop {
            let mv = backward.mv[cur.index()].unwrap();
            let pred = backward.predecessor[cur.index()].unwrap();
            let entry = backward.entry[cur.index()].unwrap();

            suffix.push_back(mv);
            if pred == target_super {
                let segment = search::search(graph, entry, target, sub_mode)?;
                suffix.append(segment);
                break;
            }
            let segment = search::search(graph, entry, backward.exit[pred.index()].unwrap(), sub_mode)?;
            suffix.append(segment);
            cur = pred;
        }
    }

    prefix.append(meeting_segment);
    prefix.append(suffix);
    Ok(prefix)
}
