//! End-to-end compilation of the reference block graphs.
//!
//! Every reference graph must give a sealed, conflict-free circuit with
//! the expected schedule; invalid inputs and unregistered categories must
//! fail with the matching error and nothing else.

use proptest::prelude::*;
use tessera_compile::{
    BlockCategory, BlockGraphCompiler, BuilderRegistry, CompileError, CompileOptions,
    CompiledGraph, compile_block_graph,
};
use tessera_graph::{Basis, BlockGraph, Position3D, gallery};
use tessera_ir::{LinearFunction, OperationKind, StabilizerRecord};

fn options() -> CompileOptions {
    CompileOptions::default()
}

fn compile(graph: &BlockGraph, k: u32) -> CompiledGraph {
    let compiled = compile_block_graph(graph, k, &options(), None).unwrap();
    compiled.circuit.check_conflict_free().unwrap();
    compiled
}

/// `ZXZ` below `XZX`, joined by a temporal Hadamard pipe.
fn temporal_hadamard() -> BlockGraph {
    let mut graph = BlockGraph::new("temporal hadamard");
    let bottom = Position3D::new(0, 0, 0);
    let top = Position3D::new(0, 0, 1);
    graph.add_cube(bottom, "ZXZ".parse().unwrap(), "").unwrap();
    graph.add_cube(top, "XZX".parse().unwrap(), "").unwrap();
    graph.add_pipe_inferred(bottom, top).unwrap();
    graph
}

/// `XZX`, then a `ZZX` junction turning down into `ZXX`.
fn bent_junction() -> BlockGraph {
    let mut graph = BlockGraph::new("bent junction");
    let (a, b, c) = (
        Position3D::new(0, 0, 0),
        Position3D::new(1, 0, 0),
        Position3D::new(1, 1, 0),
    );
    graph.add_cube(a, "XZX".parse().unwrap(), "").unwrap();
    graph.add_cube(b, "ZZX".parse().unwrap(), "").unwrap();
    graph.add_cube(c, "ZXX".parse().unwrap(), "").unwrap();
    graph.add_pipe_inferred(a, b).unwrap();
    graph.add_pipe_inferred(b, c).unwrap();
    graph
}

/// Kinds of the operations touching the qubit of `record` in `moment`.
fn kinds_on(
    compiled: &CompiledGraph,
    moment: usize,
    record: &StabilizerRecord,
) -> Vec<OperationKind> {
    compiled
        .circuit
        .moment(moment)
        .unwrap()
        .operations()
        .iter()
        .filter(|op| op.qubits().any(|q| q == record.qubit))
        .map(|op| op.kind())
        .collect()
}

fn kinds_in(compiled: &CompiledGraph, moment: usize) -> Vec<OperationKind> {
    compiled
        .circuit
        .moment(moment)
        .unwrap()
        .operations()
        .iter()
        .map(|op| op.kind())
        .collect()
}

// ============================================================================
// Supported graphs
// ============================================================================

#[test]
fn test_memory_single_round() {
    let compiled = compile(&gallery::memory(Basis::Z).unwrap(), 1);
    assert_eq!(compiled.num_moments(), 6);
    assert_eq!(compiled.slices.len(), 1);

    let first = kinds_in(&compiled, 0);
    assert!(first.contains(&OperationKind::Reset(Basis::Z)));
    let last = kinds_in(&compiled, 5);
    assert!(last.contains(&OperationKind::Measure(Basis::Z)));
    assert!(
        last.iter()
            .all(|kind| matches!(kind, OperationKind::Measure(_)))
    );
}

#[test]
fn test_memory_x_basis() {
    let compiled = compile(&gallery::memory(Basis::X).unwrap(), 2);
    assert_eq!(compiled.num_moments(), 18);
    assert!(kinds_in(&compiled, 0).contains(&OperationKind::Reset(Basis::X)));
    assert!(kinds_in(&compiled, 17).contains(&OperationKind::Measure(Basis::X)));
    assert_eq!(compiled.circuit.count_kind(OperationKind::Reset(Basis::Z)), 0);
}

#[test]
fn test_straight_junction_runs_extended_rounds() {
    let compiled = compile(&gallery::straight_junction(Basis::Z).unwrap(), 1);
    assert!(compiled.has_extended_rounds());
    assert_eq!(compiled.slices.len(), 1);
    assert_eq!(compiled.slices[0].round_length, 8);
    assert_eq!(compiled.num_moments(), 8);

    // Padded regular plaquettes measure at the end of the round too.
    for record in compiled.circuit.stabilizer_records() {
        assert_eq!(record.moment, 7);
    }
    let blocks: std::collections::BTreeSet<Position3D> = compiled
        .circuit
        .stabilizer_records()
        .iter()
        .map(|r| r.tag.block)
        .collect();
    assert_eq!(blocks.len(), 3);

    // Plaquettes of the side cubes keep the regular schedule and idle
    // through the two inserted moments.
    let sides = [Position3D::new(0, 0, 0), Position3D::new(2, 0, 0)];
    let records: Vec<&StabilizerRecord> = compiled
        .circuit
        .stabilizer_records()
        .iter()
        .filter(|r| sides.contains(&r.tag.block))
        .collect();
    assert!(!records.is_empty());
    for record in records {
        assert_eq!(kinds_on(&compiled, 0, record), vec![OperationKind::Reset(Basis::X)]);
        let interactions: Vec<OperationKind> =
            (1..=4).flat_map(|m| kinds_on(&compiled, m, record)).collect();
        assert!(!interactions.is_empty(), "{}", record.tag);
        assert!(interactions
            .iter()
            .all(|kind| matches!(kind, OperationKind::ControlledPauli(_))));
        assert!(kinds_on(&compiled, 5, record).is_empty(), "{}", record.tag);
        assert!(kinds_on(&compiled, 6, record).is_empty(), "{}", record.tag);
        assert_eq!(kinds_on(&compiled, 7, record), vec![OperationKind::Measure(Basis::X)]);
    }
}

#[test]
fn test_temporal_hadamard() {
    let compiled = compile(&temporal_hadamard(), 1);
    assert_eq!(compiled.num_moments(), 12);
    assert_eq!(compiled.slices.len(), 2);
    assert_eq!(compiled.slices[1].first_moment, 6);
    assert!(compiled.circuit.count_kind(OperationKind::Hadamard) > 0);

    // Reset in the bottom basis, measure in the top one.
    assert!(kinds_in(&compiled, 0).contains(&OperationKind::Reset(Basis::Z)));
    assert!(kinds_in(&compiled, 11).contains(&OperationKind::Measure(Basis::X)));
}

#[test]
fn test_cnot() {
    let compiled = compile(&gallery::cnot(Some(Basis::Z)).unwrap(), 1);
    assert_eq!(compiled.slices.len(), 4);
    assert_eq!(compiled.num_moments(), 24);
    assert!(!compiled.has_extended_rounds());
    assert!(!compiled.observables.is_empty());

    let slices = serde_json::to_value(&compiled.slices).unwrap();
    assert_eq!(slices[1]["z"], 1);
    assert_eq!(slices[1]["first_moment"], 6);
}

#[test]
fn test_stabilizer_tags_point_at_cubes() {
    let graph = gallery::cnot(Some(Basis::X)).unwrap();
    let compiled = compile(&graph, 2);
    for record in compiled.circuit.stabilizer_records() {
        assert!(graph.cube(record.tag.block).is_some());
        let slice = compiled
            .slices
            .iter()
            .find(|s| s.z == record.tag.block.z)
            .unwrap();
        assert!(record.moment >= slice.first_moment);
        assert!(record.moment < slice.first_moment + slice.num_moments());
    }
}

#[test]
fn test_parallel_matches_sequential() {
    for graph in [
        gallery::cnot(Some(Basis::Z)).unwrap(),
        gallery::straight_junction(Basis::X).unwrap(),
        temporal_hadamard(),
    ] {
        let parallel = compile_block_graph(&graph, 2, &options(), None).unwrap();
        let sequential =
            compile_block_graph(&graph, 2, &options().with_parallel(false), None).unwrap();
        assert_eq!(
            parallel.circuit.to_json().unwrap(),
            sequential.circuit.to_json().unwrap(),
            "{}",
            graph.name()
        );
    }
}

#[test]
fn test_explicit_observables_are_kept() {
    let graph = gallery::cnot(Some(Basis::Z)).unwrap();
    let surfaces = graph.find_correlation_surfaces().unwrap();
    let first = surfaces[..1].to_vec();
    let compiled = compile_block_graph(&graph, 1, &options(), Some(first.clone())).unwrap();
    assert_eq!(compiled.observables, first);
}

#[test]
fn test_bent_junction() {
    let compiled = compile(&bent_junction(), 1);
    assert!(compiled.has_extended_rounds());
    let blocks: std::collections::BTreeSet<Position3D> = compiled
        .circuit
        .stabilizer_records()
        .iter()
        .map(|r| r.tag.block)
        .collect();
    assert_eq!(blocks.len(), 3);
}

#[test]
fn test_junction_gallery() {
    for basis in Basis::ALL {
        for graph in [
            gallery::move_rotation(Some(basis)).unwrap(),
            gallery::three_cnots(Some(basis)).unwrap(),
            gallery::cz(Some(basis)).unwrap(),
        ] {
            let compiled = compile(&graph, 1);
            assert!(compiled.has_extended_rounds(), "{}", graph.name());
        }
    }
}

#[test]
fn test_hadamard_pipe_at_junction() {
    let compiled = compile(&gallery::cz(Some(Basis::Z)).unwrap(), 2);
    assert_eq!(compiled.slices.len(), 3);
    assert!(compiled.slices[1].is_extended());
    let junction = Position3D::new(1, 0, 1);
    let rounds: std::collections::BTreeSet<usize> = compiled
        .circuit
        .stabilizer_records()
        .iter()
        .filter(|r| r.tag.block == junction)
        .map(|r| r.tag.round)
        .collect();
    assert_eq!(rounds.len(), 3);
}

#[test]
fn test_s_gate_measures_half_cube_in_y() {
    let compiled = compile(&gallery::s_gate_teleportation(Some(Basis::Z)).unwrap(), 1);
    assert!(compiled.circuit.count_kind(OperationKind::MeasureY) > 0);
    assert_eq!(compiled.circuit.count_kind(OperationKind::ResetY), 0);
    let last = compiled.num_moments() - 1;
    assert!(kinds_in(&compiled, last).contains(&OperationKind::MeasureY));
}

// ============================================================================
// Rejected inputs
// ============================================================================

#[test]
fn test_empty_graph() {
    assert!(matches!(
        compile_block_graph(&BlockGraph::new("empty"), 1, &options(), None),
        Err(CompileError::EmptyGraph)
    ));
}

#[test]
fn test_open_ports() {
    match compile_block_graph(&gallery::move_rotation(None).unwrap(), 1, &options(), None) {
        Err(CompileError::OpenPorts { ports }) => {
            assert_eq!(ports, vec!["In".to_string(), "Out".to_string()]);
        }
        other => panic!("expected open ports, got {other:?}"),
    }
}

#[test]
fn test_invalid_scale() {
    assert!(matches!(
        compile_block_graph(&gallery::memory(Basis::Z).unwrap(), 0, &options(), None),
        Err(CompileError::InvalidScale { k: 0 })
    ));
}

#[test]
fn test_unregistered_category() {
    let graph = gallery::s_gate_teleportation(Some(Basis::Z)).unwrap();
    let mut registry = BuilderRegistry::standard();
    registry.unregister(BlockCategory::HalfCube);
    let compiler = BlockGraphCompiler::new(options()).with_registry(registry);
    match compiler.compile(&graph, 1, None) {
        Err(CompileError::UnsupportedKind { category, position }) => {
            assert_eq!(category, BlockCategory::HalfCube);
            assert_eq!(position, Position3D::new(1, 0, 2));
        }
        other => panic!("expected unsupported kind, got {other:?}"),
    }
}

#[test]
fn test_invalid_rounds() {
    let compiler = BlockGraphCompiler::new(options().with_rounds(LinearFunction::new(1, -3)));
    let graph = gallery::memory(Basis::Z).unwrap();
    assert!(matches!(
        compiler.compile(&graph, 2, None),
        Err(CompileError::InvalidRounds { value: -1, .. })
    ));
    assert!(compiler.compile(&graph, 4, None).is_ok());
}

// ============================================================================
// Scaling
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(6))]

    /// Memory experiments run `2k - 1` regular rounds with the same
    /// stabilizers measured in each.
    #[test]
    fn memory_scales_with_k(k in 1_u32..4, basis in prop::sample::select(vec![Basis::X, Basis::Z])) {
        let compiled = compile(&gallery::memory(basis).unwrap(), k);
        let rounds = (2 * k - 1) as usize;
        prop_assert_eq!(compiled.num_moments(), 6 * rounds);

        let records = compiled.circuit.stabilizer_records();
        let per_round = records.iter().filter(|r| r.tag.round == 0).count();
        prop_assert!(per_round > 0);
        prop_assert_eq!(records.len(), rounds * per_round);
    }
}
