//! Benchmarks for Tessera correlation surface search
//!
//! Run with: cargo bench -p tessera-graph

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tessera_graph::gallery;
use tessera_graph::{BlockGraph, Position3D};

/// A straight line of `n` stacked memory cubes with a port at each end.
fn memory_line(n: i32) -> BlockGraph {
    let mut graph = BlockGraph::new("line");
    graph
        .add_cube(Position3D::new(0, 0, 0), "P".parse().unwrap(), "In")
        .unwrap();
    for z in 1..=n {
        graph
            .add_cube(Position3D::new(0, 0, z), "ZXZ".parse().unwrap(), "")
            .unwrap();
    }
    graph
        .add_cube(Position3D::new(0, 0, n + 1), "P".parse().unwrap(), "Out")
        .unwrap();
    for z in 0..=n {
        graph
            .add_pipe_inferred(Position3D::new(0, 0, z), Position3D::new(0, 0, z + 1))
            .unwrap();
    }
    graph
}

fn bench_gallery(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation_gallery");

    let graphs = [
        ("cnot", gallery::cnot(None).unwrap()),
        ("three_cnots", gallery::three_cnots(None).unwrap()),
        ("move_rotation", gallery::move_rotation(None).unwrap()),
    ];
    for (name, graph) in &graphs {
        group.bench_function(*name, |b| {
            b.iter(|| black_box(graph).find_correlation_surfaces().unwrap());
        });
    }

    group.finish();
}

fn bench_memory_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation_line");

    for n in &[4, 16, 64] {
        let graph = memory_line(*n);
        group.bench_with_input(BenchmarkId::new("cubes", n), &graph, |b, graph| {
            b.iter(|| graph.find_correlation_surfaces().unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_gallery, bench_memory_line);
criterion_main!(benches);
