//! End-to-end scenarios against small hand-written schematics, mirroring
//! the concrete worked examples.

use latticepath::{Coordinate, Error, LatticeError, SearchMode, TripPlan, World};

fn lattice(body: &str) -> latticepath::Lattice {
    World::parse(body.as_bytes()).unwrap().into_lattice()
}

#[test_log::test]
fn bfs_finds_the_forward_route() {
    let lattice = lattice("4 1 2\nf\n0\n");
    let route = lattice
        .search(TripPlan::new(Coordinate::new(0, 0, 1), Coordinate::new(3, 0, 1)), SearchMode::Bfs)
        .unwrap();
    assert_eq!(route.to_string(), "eee");
}

#[test]
fn bfs_finds_the_reverse_route() {
    let lattice = lattice("4 1 2\nf\n0\n");
    let route = lattice
        .search(TripPlan::new(Coordinate::new(3, 0, 1), Coordinate::new(0, 0, 1)), SearchMode::Bfs)
        .unwrap();
    assert_eq!(route.to_string(), "www");
}

#[test]
fn same_source_and_target_is_the_empty_route() {
    let lattice = lattice("4 1 2\nf\n0\n");
    let route = lattice
        .search(TripPlan::new(Coordinate::new(1, 0, 1), Coordinate::new(1, 0, 1)), SearchMode::Dfs)
        .unwrap();
    assert!(route.is_empty());
}

#[test_log::test]
fn astar_routes_around_a_solid_block() {
    // floor `f`, layer-1 `8` (solid at x=0), layer-2 `0` (all open): a
    // two-way step connects (1,0,1) to the node sitting atop the block.
    let lattice = lattice("4 1 3\nf\n8\n0\n");
    let route = lattice
        .search(TripPlan::new(Coordinate::new(1, 0, 1), Coordinate::new(0, 0, 2)), SearchMode::AStar)
        .unwrap();

    let arrived = lattice.travel(Coordinate::new(1, 0, 1), &route).unwrap();
    assert_eq!(arrived, Coordinate::new(0, 0, 2));
    assert!(route.to_string().contains('w'));
}

#[test]
fn disconnected_islands_are_untraversable() {
    // 5-wide floor, full-height wall at x=2 splitting it into two islands.
    let lattice = lattice("5 1 2\nf8\n20\n");
    let result = lattice.search(
        TripPlan::new(Coordinate::new(0, 0, 1), Coordinate::new(4, 0, 1)),
        SearchMode::Bfs,
    );
    assert!(matches!(result, Err(Error::Lattice(LatticeError::Untraversable(_, _)))));
}

#[test]
fn a_source_with_no_node_is_invalid() {
    let lattice = lattice("4 1 2\nf\n0\n");
    let result = lattice.search(
        TripPlan::new(Coordinate::new(-1, 0, 0), Coordinate::new(0, 0, 1)),
        SearchMode::Bfs,
    );
    assert!(matches!(result, Err(Error::Lattice(LatticeError::InvalidSource(_)))));
}
