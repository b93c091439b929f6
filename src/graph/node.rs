use smallvec::SmallVec;

use crate::coordinate::{Coordinate, Move};

/// Dense index into [`crate::graph::Graph`]'s node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn new(index: u32) -> Self {
        NodeId(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Dense index into [`crate::graph::Graph`]'s arc arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArcId(u32);

impl ArcId {
    pub fn new(index: u32) -> Self {
        ArcId(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An edge in the motion graph: a destination node reached by a single
/// cardinal move.
#[derive(Debug, Clone, Copy)]
pub struct Arc {
    pub from: NodeId,
    pub to: NodeId,
    pub mv: Move,
}

/// Most standable positions have very few neighbours; inline storage
/// avoids a heap allocation per node for the common case.
pub type ArcList = SmallVec<[ArcId; 4]>;

/// A standable position: an air voxel whose `-z` neighbour is solid.
#[derive(Debug, Clone)]
pub struct Node {
    pub coordinate: Coordinate,
    pub outgoing: ArcList,
    pub incoming: ArcList,
    /// Set once [`crate::condense::condense`] has run.
    pub super_node: Option<crate::condense::SuperId>,
}

impl Node {
    pub(crate) fn new(coordinate: Coordinate) -> Self {
        Node {
            coordinate,
            outgoing: ArcList::new(),
            incoming: ArcList::new(),
            super_node: None,
        }
    }
}
