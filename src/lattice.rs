//! The queryable lattice: a built motion graph plus its (optional)
//! condensation, exposing the public search/verify surface over
//! coordinates rather than the internal dense ids.

use log::{debug, trace};

use crate::condense::{self, Condensation};
use crate::coordinate::{Coordinate, Route};
use crate::error::{Error, LatticeError};
use crate::graph::Graph;
use crate::search::{self, SearchMode};
use crate::super_search;
use crate::travel;
use crate::trip::TripPlan;

/// A built voxel world, ready for queries. `condense()` must run before
/// any super-level query; calling it more than once is a no-op.
pub struct Lattice {
    graph: Graph,
    extents: (i32, i32, i32),
    condensation: Option<Condensation>,
    /// When true, `super_verify` skips two-member components as both
    /// source and target probes, matching the original's "ignore windows
    /// in bastion" behaviour. Defaults to `true`.
    skip_small_super_components: bool,
}

impl Lattice {
    pub(crate) fn new(graph: Graph, extents: (i32, i32, i32)) -> Self {
        Lattice {
            graph,
            extents,
            condensation: None,
            skip_small_super_components: true,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of strongly connected components in the condensation.
    /// Panics if [`Lattice::condense`] has not run yet.
    pub fn super_node_count(&self) -> usize {
        self.condensation.as_ref().expect("condense() must run before super_node_count").super_node_count()
    }

    pub fn extents(&self) -> (i32, i32, i32) {
        self.extents
    }

    /// Opts out of the default "skip size-2 super-components" behaviour
    /// in [`Lattice::super_verify`].
    pub fn with_skip_small_super_components(mut self, skip: bool) -> Self {
        self.skip_small_super_components = skip;
        self
    }

    /// Condenses the motion graph into an SCC DAG. Idempotent: a second
    /// call is a no-op once the condensation is populated.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn condense(&mut self) {
        if self.condensation.is_some() {
            return;
        }
        debug!("condensing {} nodes", self.graph.node_count());
        self.condensation = Some(condense::condense(&mut self.graph));
    }

    fn node_at(&self, coordinate: Coordinate) -> Option<crate::graph::NodeId> {
        self.graph.node_at(coordinate)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn search(&self, trip: TripPlan, mode: SearchMode) -> Result<Route, Error> {
        trace!("search {:?} from {} to {}", mode, trip.source, trip.target);
        let source = self.node_at(trip.source).ok_or(LatticeError::InvalidSource(trip.source))?;
        let target = self.node_at(trip.target).ok_or(LatticeError::InvalidTarget(trip.target))?;
        Ok(search::search(&self.graph, source, target, mode)?)
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn super_search(&self, trip: TripPlan, super_mode: SearchMode, sub_mode: SearchMode) -> Result<Route, Error> {
        trace!(
            "super_search {:?}/{:?} from {} to {}",
            super_mode,
            sub_mode,
            trip.source,
            trip.target
        );
        let source = self.node_at(trip.source).ok_or(LatticeError::InvalidSource(trip.source))?;
        let target = self.node_at(trip.target).ok_or(LatticeError::InvalidTarget(trip.target))?;
        let condensation = self.condensation.as_ref().expect("condense() must run before super_search");
        Ok(super_search::super_search(&self.graph, condensation, source, target, super_mode, sub_mode)?)
    }

    pub fn travel(&self, source: Coordinate, route: &Route) -> Result<Coordinate, Error> {
        let node = self.node_at(source).ok_or(LatticeError::InvalidSource(source))?;
        let result = travel::travel(&self.graph, node, route)?;
        Ok(self.graph.coordinate_of(result))
    }

    /// For every ordered pair of nodes, runs `mode`, silently skips
    /// *Untraversable* pairs, and replays every returned route. Returns
    /// true iff every produced route arrives at its claimed target.
    pub fn verify(&self, mode: SearchMode) -> bool {
        use rayon::prelude::*;

        let ids: Vec<_> = self.graph.node_ids().collect();
        ids.par_iter().all(|&source| {
            ids.iter().all(|&target| {
                match search::search(&self.graph, source, target, mode) {
                    Ok(route) => match travel::travel(&self.graph, source, &route) {
                        Ok(arrived) => arrived == target,
                        Err(_) => false,
                    },
                    Err(LatticeError::Untraversable(_, _)) => true,
                    Err(_) => false,
                }
            })
        })
    }

    /// Same as [`Lattice::verify`] at the super-node level, probing each
    /// component via its first and last member. Two-member components are
    /// skipped by default (see `skip_small_super_components`).
    pub fn super_verify(&self, super_mode: SearchMode, sub_mode: SearchMode) -> bool {
        use rayon::prelude::*;

        let condensation = self.condensation.as_ref().expect("condense() must run before super_verify");
        let ids: Vec<_> = condensation.super_ids().collect();

        let probes: Vec<(crate::graph::NodeId, crate::graph::NodeId)> = ids
            .iter()
            .filter_map(|&id| {
                let members = &condensation.super_node(id).members;
                if self.skip_small_super_components && members.len() == 2 {
                    return None;
                }
                let first = *members.first()?;
                let last = *members.last()?;
                Some((first, last))
            })
            .collect();

        probes.par_iter().all(|&(source, _)| {
            probes.iter().all(|&(_, target)| {
                let trip = TripPlan::new(self.graph.coordinate_of(source), self.graph.coordinate_of(target));
                match self.super_search(trip, super_mode, sub_mode) {
                    Ok(route) => match self.travel(trip.source, &route) {
                        Ok(arrived) => arrived == trip.target,
                        Err(_) => false,
                    },
                    Err(Error::Lattice(LatticeError::Untraversable(_, _))) => true,
                    Err(_) => false,
                }
            })
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::coordinate::Coordinate;
    use crate::graph::Graph;

    fn line_lattice() -> (Lattice, Coordinate, Coordinate) {
        let mut g = Graph::new();
        let a = g.place_node(Coordinate::new(0, 0, 1));
        let b = g.place_node(Coordinate::new(1, 0, 1));
        let c = g.place_node(Coordinate::new(2, 0, 1));
        g.link(a, b, crate::coordinate::Move::East);
        g.link(b, a, crate::coordinate::Move::West);
        g.link(b, c, crate::coordinate::Move::East);
        g.link(c, b, crate::coordinate::Move::West);
        let lattice = Lattice::new(g, (3, 1, 2));
        (lattice, Coordinate::new(0, 0, 1), Coordinate::new(2, 0, 1))
    }

    #[test]
    fn search_resolves_coordinates_to_a_route() {
        let (lattice, source, target) = line_lattice();
        let route = lattice.search(TripPlan::new(source, target), SearchMode::Bfs).unwrap();
        assert_eq!(route.to_string(), "ee");
    }

    #[test]
    fn search_with_unplaced_source_is_invalid() {
        let (lattice, _source, target) = line_lattice();
        let missing = Coordinate::new(-1, 0, 0);
        assert!(matches!(
            lattice.search(TripPlan::new(missing, target), SearchMode::Bfs),
            Err(Error::Lattice(LatticeError::InvalidSource(_)))
        ));
    }

    #[test]
    fn condense_then_super_search_round_trips() {
        let (mut lattice, source, target) = line_lattice();
        lattice.condense();
        let route = lattice
            .super_search(TripPlan::new(source, target), SearchMode::Bfs, SearchMode::Bfs)
            .unwrap();
        assert_eq!(lattice.travel(source, &route).unwrap(), target);
    }

    #[test]
    fn verify_passes_on_a_fully_connected_line() {
        let (lattice, _source, _target) = line_lattice();
        assert!(lattice.verify(SearchMode::Bfs));
    }

    #[test]
    fn condense_is_idempotent() {
        let (mut lattice, _source, _target) = line_lattice();
        lattice.condense();
        let first_count = lattice.condensation.as_ref().unwrap().super_node_count();
        lattice.condense();
        assert_eq!(lattice.condensation.as_ref().unwrap().super_node_count(), first_count);
    }
}
