//! Reference block graphs.
//!
//! Functions taking an `Option<Basis>` leave the ports open on `None` and
//! fill them with cubes carrying the observable basis otherwise.

use std::collections::BTreeMap;

use tessera_ir::{Basis, Position3D};

use crate::cube::{CubeKind, ZXCube};
use crate::error::GraphResult;
use crate::graph::BlockGraph;

fn zx(x: Basis, y: Basis, z: Basis) -> GraphResult<CubeKind> {
    Ok(CubeKind::ZX(ZXCube::new(x, y, z)?))
}

fn named(s: &str) -> GraphResult<CubeKind> {
    s.parse()
}

fn p(x: i32, y: i32, z: i32) -> Position3D {
    Position3D::new(x, y, z)
}

/// Build a graph from labelled cubes and inferred pipes.
fn assemble(
    name: &str,
    cubes: &[((i32, i32, i32), &str, &str)],
    pipes: &[((i32, i32, i32), (i32, i32, i32))],
) -> GraphResult<BlockGraph> {
    let mut graph = BlockGraph::new(name);
    for ((x, y, z), kind, label) in cubes {
        graph.add_cube(p(*x, *y, *z), named(kind)?, *label)?;
    }
    for (a, b) in pipes {
        graph.add_pipe_inferred(Position3D::from(*a), Position3D::from(*b))?;
    }
    Ok(graph)
}

fn fill(
    graph: BlockGraph,
    basis: Option<Basis>,
    kinds: impl Fn(Basis) -> Vec<(&'static str, String)>,
) -> GraphResult<BlockGraph> {
    let Some(basis) = basis else {
        return Ok(graph);
    };
    let mut fill = BTreeMap::new();
    for (label, kind) in kinds(basis) {
        fill.insert(label.to_string(), named(&kind)?);
    }
    graph.fill_ports_with(&fill)
}

/// Single cube memory experiment.
pub fn memory(basis: Basis) -> GraphResult<BlockGraph> {
    let mut graph = BlockGraph::new(format!("{basis} basis memory"));
    graph.add_cube(p(0, 0, 0), zx(Basis::Z, Basis::X, basis)?, "")?;
    Ok(graph)
}

/// Single cube stability experiment.
pub fn stability(basis: Basis) -> GraphResult<BlockGraph> {
    let mut graph = BlockGraph::new(format!("{basis} basis stability"));
    graph.add_cube(p(0, 0, 0), zx(basis, basis, basis.flipped())?, "")?;
    Ok(graph)
}

/// Lattice-surgery CNOT between a control and a target patch.
pub fn cnot(basis: Option<Basis>) -> GraphResult<BlockGraph> {
    let graph = assemble(
        "logical cnot",
        &[
            ((0, 0, 0), "P", "In_Control"),
            ((0, 0, 1), "ZXX", ""),
            ((0, 0, 2), "ZXZ", ""),
            ((0, 0, 3), "P", "Out_Control"),
            ((0, 1, 1), "ZXX", ""),
            ((0, 1, 2), "ZXZ", ""),
            ((1, 1, 0), "P", "In_Target"),
            ((1, 1, 1), "ZXZ", ""),
            ((1, 1, 2), "ZXZ", ""),
            ((1, 1, 3), "P", "Out_Target"),
        ],
        &[
            ((0, 0, 0), (0, 0, 1)),
            ((0, 0, 1), (0, 0, 2)),
            ((0, 0, 2), (0, 0, 3)),
            ((0, 0, 1), (0, 1, 1)),
            ((0, 1, 1), (0, 1, 2)),
            ((0, 1, 2), (1, 1, 2)),
            ((1, 1, 0), (1, 1, 1)),
            ((1, 1, 1), (1, 1, 2)),
            ((1, 1, 2), (1, 1, 3)),
        ],
    )?;
    fill(graph, basis, |b| {
        let kind = format!("ZX{b}");
        ["In_Control", "Out_Control", "In_Target", "Out_Target"]
            .into_iter()
            .map(|label| (label, kind.clone()))
            .collect()
    })
}

/// Move a patch in space and rotate its boundaries.
pub fn move_rotation(basis: Option<Basis>) -> GraphResult<BlockGraph> {
    let graph = assemble(
        "move rotation",
        &[
            ((0, 0, 0), "P", "In"),
            ((0, 0, 1), "ZXX", ""),
            ((0, 1, 1), "ZZX", ""),
            ((1, 1, 1), "XZX", ""),
            ((1, 1, 2), "P", "Out"),
        ],
        &[
            ((0, 0, 0), (0, 0, 1)),
            ((0, 0, 1), (0, 1, 1)),
            ((0, 1, 1), (1, 1, 1)),
            ((1, 1, 1), (1, 1, 2)),
        ],
    )?;
    fill(graph, basis, |b| {
        vec![("In", format!("ZX{b}")), ("Out", format!("XZ{b}"))]
    })
}

/// A spatial junction with a memory cube on each side along `x`.
///
/// `basis` is the basis of the junction's four spatial walls.
pub fn straight_junction(basis: Basis) -> GraphResult<BlockGraph> {
    let other = basis.flipped();
    let mut graph = BlockGraph::new(format!("{basis} straight junction"));
    let left = graph.add_cube(p(0, 0, 0), zx(other, basis, other)?, "")?;
    let junction = graph.add_cube(p(1, 0, 0), zx(basis, basis, other)?, "")?;
    let right = graph.add_cube(p(2, 0, 0), zx(other, basis, other)?, "")?;
    graph.add_pipe_inferred(left, junction)?;
    graph.add_pipe_inferred(junction, right)?;
    Ok(graph)
}

/// Three CNOTs sharing two adjacent spatial junctions.
pub fn three_cnots(basis: Option<Basis>) -> GraphResult<BlockGraph> {
    let graph = assemble(
        "three cnots",
        &[
            ((-1, 0, 0), "P", "Out_a"),
            ((0, -1, 0), "P", "In_a"),
            ((0, 0, 0), "XXZ", ""),
            ((0, 1, 0), "XXZ", ""),
            ((1, 0, -1), "P", "In_b"),
            ((1, 0, 0), "ZXZ", ""),
            ((1, 0, 1), "ZXX", ""),
            ((1, 0, 2), "P", "Out_b"),
            ((1, 1, -1), "P", "In_c"),
            ((1, 1, 0), "ZXZ", ""),
            ((1, 1, 1), "ZXX", ""),
            ((2, 1, 0), "P", "Out_c"),
        ],
        &[
            ((-1, 0, 0), (0, 0, 0)),
            ((0, -1, 0), (0, 0, 0)),
            ((0, 0, 0), (0, 1, 0)),
            ((0, 0, 0), (1, 0, 0)),
            ((0, 1, 0), (1, 1, 0)),
            ((1, 0, -1), (1, 0, 0)),
            ((1, 1, -1), (1, 1, 0)),
            ((1, 1, 0), (2, 1, 0)),
            ((1, 0, 0), (1, 0, 1)),
            ((1, 0, 1), (1, 0, 2)),
            ((1, 0, 1), (1, 1, 1)),
            ((1, 1, 0), (1, 1, 1)),
        ],
    )?;
    fill(graph, basis, |b| match b {
        Basis::Z => vec![
            ("In_a", "XZZ".to_string()),
            ("In_b", "ZXZ".to_string()),
            ("In_c", "ZXZ".to_string()),
            ("Out_a", "ZXZ".to_string()),
            ("Out_b", "ZXZ".to_string()),
            ("Out_c", "ZXZ".to_string()),
        ],
        Basis::X => vec![
            ("In_a", "XXZ".to_string()),
            ("In_b", "ZXX".to_string()),
            ("In_c", "ZXX".to_string()),
            ("Out_a", "XXZ".to_string()),
            ("Out_b", "ZXX".to_string()),
            ("Out_c", "XXZ".to_string()),
        ],
    })
}

/// Logical CZ through a Hadamard pipe.
pub fn cz(basis: Option<Basis>) -> GraphResult<BlockGraph> {
    let graph = assemble(
        "logical cz",
        &[
            ((0, 0, 0), "P", "In_1"),
            ((0, 0, 1), "XZX", ""),
            ((0, 0, 2), "P", "Out_1"),
            ((1, -1, 1), "P", "In_2"),
            ((1, 0, 1), "XXZ", ""),
            ((1, 1, 1), "P", "Out_2"),
        ],
        &[
            ((0, 0, 0), (0, 0, 1)),
            ((0, 0, 1), (0, 0, 2)),
            ((0, 0, 1), (1, 0, 1)),
            ((1, -1, 1), (1, 0, 1)),
            ((1, 0, 1), (1, 1, 1)),
        ],
    )?;
    fill(graph, basis, |b| {
        vec![
            ("In_1", format!("XZ{b}")),
            ("Out_1", format!("XZ{b}")),
            ("In_2", format!("X{b}Z")),
            ("Out_2", format!("X{b}Z")),
        ]
    })
}

/// Logical S gate by teleportation through a Y half cube.
pub fn s_gate_teleportation(basis: Option<Basis>) -> GraphResult<BlockGraph> {
    let graph = assemble(
        "s gate teleportation",
        &[
            ((0, 0, 0), "P", "In"),
            ((0, 0, 1), "XZX", ""),
            ((0, 0, 2), "P", "Out"),
            ((1, 0, 1), "XZX", ""),
            ((1, 0, 2), "Y", ""),
        ],
        &[
            ((0, 0, 0), (0, 0, 1)),
            ((0, 0, 1), (0, 0, 2)),
            ((0, 0, 1), (1, 0, 1)),
            ((1, 0, 1), (1, 0, 2)),
        ],
    )?;
    fill(graph, basis, |b| {
        vec![("In", format!("XZ{b}")), ("Out", format!("XZ{b}"))]
    })
}
