use criterion::{criterion_group, criterion_main, Criterion};
use latticepath::{Coordinate, Lattice, SearchMode, TripPlan, World};

fn flat_floor_world(size: usize) -> Vec<u8> {
    let row_len = size.div_ceil(4);
    let solid_row = "f".repeat(row_len);
    let open_row = "0".repeat(row_len);

    let mut body = format!("{size} {size} 2\n");
    for _ in 0..size {
        body.push_str(&solid_row);
        body.push('\n');
    }
    for _ in 0..size {
        body.push_str(&open_row);
        body.push('\n');
    }
    body.into_bytes()
}

fn lattice(size: usize) -> Lattice {
    let mut lattice = World::parse(&flat_floor_world(size)).unwrap().into_lattice();
    lattice.condense();
    lattice
}

fn search_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.significance_level(0.1).sample_size(30);

    let lattice = lattice(32);
    let trip = TripPlan::new(Coordinate::new(0, 0, 1), Coordinate::new(31, 31, 1));

    for mode in [SearchMode::Bfs, SearchMode::Dfs, SearchMode::Gbfs, SearchMode::AStar, SearchMode::BidirectionalBfs] {
        group.bench_function(format!("{mode:?}"), |b| {
            b.iter(|| lattice.search(trip, mode).unwrap());
        });
    }

    group.bench_function("super_search_bfs_bfs", |b| {
        b.iter(|| lattice.super_search(trip, SearchMode::Bfs, SearchMode::Bfs).unwrap());
    });

    group.finish();
}

criterion_group!(search_benches, search_benchmark);
criterion_main!(search_benches);
