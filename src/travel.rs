//! Replays a route against the graph, one move at a time.

use crate::coordinate::Route;
use crate::error::LatticeError;
use crate::graph::{Graph, NodeId};

/// Starting at `source`, scans outgoing arcs for each move in turn.
/// Fails with [`LatticeError::InvalidRoute`] at the first move with no
/// matching outgoing arc.
pub fn travel(graph: &Graph, source: NodeId, route: &Route) -> Result<NodeId, LatticeError> {
    let mut current = source;
    for (index, mv) in route.moves().iter().enumerate() {
        let next = graph.outgoing(current).find(|arc| arc.mv == *mv).map(|arc| arc.to);
        match next {
            Some(node) => current = node,
            None => return Err(LatticeError::InvalidRoute(*mv, index)),
        }
    }
    Ok(current)
}
