//! Tarjan strongly-connected-components condensation of the node graph
//! into a DAG of super-nodes, annotated with the cross-component arcs
//! needed to materialise a hierarchical route later.
//!
//! Reimplemented iteratively (an explicit work stack standing in for the
//! call stack) so condensation does not blow the stack on worlds whose
//! motion graph forms one long chain.

use smallvec::SmallVec;

use crate::graph::{ArcId, Graph, NodeId};

/// Dense index into a [`Condensation`]'s super-node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SuperId(u32);

impl SuperId {
    pub fn new(index: u32) -> Self {
        SuperId(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A directed edge between two super-nodes, retaining the node-level
/// coupling (exit node and the arc that crosses the boundary) needed to
/// reconstruct a concrete route later.
#[derive(Debug, Clone, Copy)]
pub struct SuperArc {
    pub other: SuperId,
    pub exit: NodeId,
    pub link: ArcId,
}

/// A strongly connected component of the motion graph.
#[derive(Debug, Clone)]
pub struct SuperNode {
    pub members: Vec<NodeId>,
    pub outgoing: SmallVec<[SuperArc; 4]>,
    pub incoming: SmallVec<[SuperArc; 4]>,
}

/// The condensed super-graph produced by [`condense`].
#[derive(Debug, Clone, Default)]
pub struct Condensation {
    super_nodes: Vec<SuperNode>,
}

impl Condensation {
    pub fn super_node_count(&self) -> usize {
        self.super_nodes.len()
    }

    pub fn super_node(&self, id: SuperId) -> &SuperNode {
        &self.super_nodes[id.index()]
    }

    pub fn super_ids(&self) -> impl Iterator<Item = SuperId> {
        (0..self.super_nodes.len() as u32).map(SuperId::new)
    }
}

struct Frame {
    node: NodeId,
    arc_index: usize,
}

/// Runs Tarjan's algorithm over `graph`'s outgoing arcs, assigns each node
/// its owning super-node, and returns the condensed super-graph.
pub fn condense(graph: &mut Graph) -> Condensation {
    let n = graph.node_count();
    let mut visit_time: Vec<Option<u32>> = vec![None; n];
    let mut low_link: Vec<u32> = vec![0; n];
    let mut on_stack: Vec<bool> = vec![false; n];
    let mut index_stack: Vec<NodeId> = Vec::new();
    let mut next_time: u32 = 0;

    let mut super_nodes: Vec<SuperNode> = Vec::new();
    let mut owner: Vec<Option<SuperId>> = vec![None; n];

    for start in 0..n as u32 {
        let start = NodeId::new(start);
        if visit_time[start.index()].is_some() {
            continue;
        }

        let mut work: Vec<Frame> = vec![Frame { node: start, arc_index: 0 }];
        visit_time[start.index()] = Some(next_time);
        low_link[start.index()] = next_time;
        next_time += 1;
        index_stack.push(start);
        on_stack[start.index()] = true;

        while let Some(frame) = work.last_mut() {
            let node = frame.node;
            let outgoing: SmallVec<[NodeId; 8]> = graph.outgoing(node).map(|a| a.to).collect();

            if frame.arc_index < outgoing.len() {
                let succ = outgoing[frame.arc_index];
                frame.arc_index += 1;

                match visit_time[succ.index()] {
                    None => {
                        visit_time[succ.index()] = Some(next_time);
                        low_link[succ.index()] = next_time;
                        next_time += 1;
                        index_stack.push(succ);
                        on_stack[succ.index()] = true;
                        work.push(Frame { node: succ, arc_index: 0 });
                    }
                    Some(succ_time) => {
                        if on_stack[succ.index()] {
                            low_link[node.index()] = low_link[node.index()].min(succ_time);
                        }
                    }
                }
            } else {
                work.pop();
                if let Some(parent) = work.last() {
                    low_link[parent.node.index()] = low_link[parent.node.index()].min(low_link[node.index()]);
                }

                if low_link[node.index()] == visit_time[node.index()].unwrap() {
                    let super_id = SuperId::new(super_nodes.len() as u32);
                    let mut members = Vec::new();
                    loop {
                        let member = index_stack.pop().expect("root must have pushed itself");
                        on_stack[member.index()] = false;
                        owner[member.index()] = Some(super_id);
                        members.push(member);
                        if member == node {
                            break;
                        }
                    }
                    super_nodes.push(SuperNode {
                        members,
                        outgoing: SmallVec::new(),
                        incoming: SmallVec::new(),
                    });
                }
            }
        }
    }

    for i in 0..n {
        let id = NodeId::new(i as u32);
        graph.set_super_node(id, owner[i].expect("every node must be assigned a super-node"));
    }

    for super_id in (0..super_nodes.len() as u32).map(SuperId::new) {
        let members = super_nodes[super_id.index()].members.clone();
        for &member in &members {
            for arc in graph.outgoing(member) {
                let dest_super = owner[arc.to.index()].unwrap();
                if dest_super != super_id {
                    let arc_id = find_arc_id(graph, member, arc.to, arc.mv);
                    super_nodes[super_id.index()].outgoing.push(SuperArc {
                        other: dest_super,
                        exit: member,
                        link: arc_id,
                    });
                    super_nodes[dest_super.index()].incoming.push(SuperArc {
                        other: super_id,
                        exit: member,
                        link: arc_id,
                    });
                }
            }
        }
    }

    Condensation { super_nodes }
}

/// Arcs are appended in deterministic order during construction, so the
/// destination/move pair uniquely identifies the arc just emitted.
fn find_arc_id(graph: &Graph, from: NodeId, to: NodeId, mv: crate::coordinate::Move) -> ArcId {
    graph
        .node(from)
        .outgoing
        .iter()
        .copied()
        .find(|&id| {
            let arc = graph.arc(id);
            arc.to == to && arc.mv == mv
        })
        .expect("arc must exist, we are iterating graph.outgoing(member) over the same graph")
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::coordinate::{Coordinate, Move};

    #[test]
    fn disjoint_nodes_form_singleton_components() {
        let mut g = Graph::new();
        g.place_node(Coordinate::new(0, 0, 1));
        g.place_node(Coordinate::new(5, 5, 1));

        let c = condense(&mut g);
        assert_eq!(c.super_node_count(), 2);
    }

    #[test]
    fn mutual_reachability_merges_into_one_component() {
        let mut g = Graph::new();
        let a = g.place_node(Coordinate::new(0, 0, 1));
        let b = g.place_node(Coordinate::new(1, 0, 1));
        g.link(a, b, Move::East);
        g.link(b, a, Move::West);

        let c = condense(&mut g);
        assert_eq!(c.super_node_count(), 1);
        assert_eq!(c.super_node(SuperId::new(0)).members.len(), 2);
    }

    #[test]
    fn one_way_chain_forms_separate_components_with_a_super_arc() {
        let mut g = Graph::new();
        let a = g.place_node(Coordinate::new(0, 0, 1));
        let b = g.place_node(Coordinate::new(1, 0, 1));
        g.link(a, b, Move::East);

        let c = condense(&mut g);
        assert_eq!(c.super_node_count(), 2);
        let a_super = g.node(a).super_node.unwrap();
        let b_super = g.node(b).super_node.unwrap();
        assert_ne!(a_super, b_super);
        assert_eq!(c.super_node(a_super).outgoing.len(), 1);
        assert_eq!(c.super_node(b_super).incoming.len(), 1);
    }
}
