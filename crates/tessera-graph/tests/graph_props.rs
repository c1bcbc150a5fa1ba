//! Property-based tests for block graph construction.
//!
//! Whatever cubes and pipes are offered, the graph only accepts pipes
//! between neighbouring positions whose walls match both endpoints, and
//! the accepted graph survives a JSON round trip.

use proptest::prelude::*;
use tessera_graph::{BlockGraph, CubeKind, Direction3D, Position3D, ZXCube};

fn arb_position() -> impl Strategy<Value = Position3D> {
    (0_i32..3, 0_i32..3, 0_i32..3).prop_map(|(x, y, z)| Position3D::new(x, y, z))
}

fn arb_kind() -> impl Strategy<Value = CubeKind> {
    let kinds: Vec<CubeKind> = ZXCube::all_kinds().into_iter().map(CubeKind::ZX).collect();
    prop::sample::select(kinds)
}

fn build(cubes: &[(Position3D, CubeKind)], pipes: &[(Position3D, Position3D)]) -> BlockGraph {
    let mut graph = BlockGraph::new("prop");
    for (position, kind) in cubes {
        let _ = graph.add_cube(*position, *kind, "");
    }
    for (a, b) in pipes {
        let _ = graph.add_pipe_inferred(*a, *b);
    }
    graph
}

proptest! {
    /// Accepted pipes join neighbours and match the cubes at both ends.
    #[test]
    fn accepted_pipes_join_neighbours(
        cubes in prop::collection::vec((arb_position(), arb_kind()), 1..20),
        pipes in prop::collection::vec((arb_position(), arb_position()), 0..40),
    ) {
        let graph = build(&cubes, &pipes);
        for pipe in graph.pipes() {
            prop_assert_eq!(pipe.u().manhattan_distance(&pipe.v()), 1);
            prop_assert!(pipe.u() < pipe.v());
            prop_assert_eq!(Direction3D::between(pipe.u(), pipe.v()), Some(pipe.direction()));
            for end in [pipe.u(), pipe.v()] {
                let cube = graph.cube(end).unwrap();
                prop_assert!(pipe
                    .kind()
                    .check_compatible_with(&cube.kind, end, pipe.at_head(end))
                    .is_ok());
            }
        }
        let degrees: usize = graph.cubes().map(|c| graph.degree(c.position)).sum();
        prop_assert_eq!(degrees, 2 * graph.num_pipes());
    }

    /// Serializing and loading an accepted graph gives it back unchanged.
    #[test]
    fn json_round_trip_preserves_graph(
        cubes in prop::collection::vec((arb_position(), arb_kind()), 1..20),
        pipes in prop::collection::vec((arb_position(), arb_position()), 0..40),
    ) {
        let graph = build(&cubes, &pipes);
        let back = BlockGraph::from_json(&graph.to_json().unwrap()).unwrap();
        prop_assert_eq!(back, graph);
    }
}
